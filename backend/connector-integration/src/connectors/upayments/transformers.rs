use common_enums::{AttemptStatus, Currency, RefundStatus};
use common_utils::{
    consts,
    crypto::generate_hex_sha256,
    masking::{PeekInterface, Secret},
    request::Method,
    types::{StringMajorUnit, StringMajorUnitForConnector},
};
use domain_types::{
    connector_flow::{Authorize, PSync, Refund},
    connector_types::{
        ChargeItem, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData,
        PaymentsSyncData, RedirectForm, RefundsData, RefundsResponseData, ResponseId,
    },
    errors::ConnectorError,
    router_data::{ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
};
use error_stack::ResultExt;
use serde::{Deserialize, Serialize};

use crate::{reconcile::reconcile, types::ResponseRouterData, utils};

type UpaymentsAuthorizeRouterData =
    RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>;
type UpaymentsSyncRouterData =
    RouterDataV2<PSync, PaymentFlowData, PaymentsSyncData, PaymentsResponseData>;
type UpaymentsRefundRouterData =
    RouterDataV2<Refund, PaymentFlowData, RefundsData, RefundsResponseData>;

pub struct UpaymentsAuthType {
    pub merchant_id: Secret<String>,
    pub secret_key: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for UpaymentsAuthType {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::SignatureKey {
                merchant_id,
                secret_key,
            } => Ok(Self {
                merchant_id: merchant_id.clone(),
                secret_key: secret_key.clone(),
            }),
            _ => Err(ConnectorError::FailedToObtainAuthType.into()),
        }
    }
}

fn sign(message: String) -> Result<Secret<String>, error_stack::Report<ConnectorError>> {
    generate_hex_sha256(message.as_bytes())
        .map(Secret::new)
        .change_context(ConnectorError::RequestEncodingFailed)
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UpaymentsProduct {
    pub product_id: String,
    pub name: String,
    pub qty: u16,
    pub price: StringMajorUnit,
}

impl UpaymentsProduct {
    fn try_from_charge_item(
        item: &ChargeItem,
        currency: Currency,
    ) -> Result<Self, error_stack::Report<ConnectorError>> {
        Ok(Self {
            product_id: item.id.clone(),
            name: item.description.clone(),
            qty: item.quantity,
            price: utils::convert_amount(&StringMajorUnitForConnector, item.unit_price, currency)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UpaymentsOrder {
    pub id: String,
    pub amount: StringMajorUnit,
    pub currency: Currency,
}

#[derive(Debug, Serialize)]
pub struct UpaymentsCustomer {
    pub uid: String,
}

#[derive(Debug, Serialize)]
pub struct UpaymentsChargeRequest {
    pub merchant_id: Secret<String>,
    pub order: UpaymentsOrder,
    pub products: Vec<UpaymentsProduct>,
    pub customer: UpaymentsCustomer,
    pub redirect_url: String,
    pub signature: Secret<String>,
}

impl TryFrom<&UpaymentsAuthorizeRouterData> for UpaymentsChargeRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: &UpaymentsAuthorizeRouterData) -> Result<Self, Self::Error> {
        let auth = UpaymentsAuthType::try_from(&item.connector_auth_type)?;
        let customer = item.resource_common_data.get_customer()?;
        let redirect_url = match item.request.router_return_url.clone() {
            Some(url) => url,
            None => item.resource_common_data.get_return_url()?,
        };
        let currency = item.request.currency;

        // Upayments signs items in the order the cart reports them.
        let charge_items = reconcile(item.request.minor_amount, &item.request.order_details)
            .change_context(ConnectorError::AmountConversionFailed)?;
        let serialized_items = utils::serialize_items_for_signature(
            &StringMajorUnitForConnector,
            &charge_items,
            currency,
        )?;
        let merchant_reference = item.resource_common_data.merchant_reference.clone();
        let signature = sign(format!(
            "{}{}{}{}{}{}",
            auth.merchant_id.peek(),
            merchant_reference,
            customer.customer_profile_id,
            redirect_url,
            serialized_items,
            auth.secret_key.peek(),
        ))?;

        Ok(Self {
            merchant_id: auth.merchant_id,
            order: UpaymentsOrder {
                id: merchant_reference,
                amount: utils::convert_amount(
                    &StringMajorUnitForConnector,
                    item.request.minor_amount,
                    currency,
                )?,
                currency,
            },
            products: charge_items
                .iter()
                .map(|charge_item| UpaymentsProduct::try_from_charge_item(charge_item, currency))
                .collect::<Result<Vec<_>, _>>()?,
            customer: UpaymentsCustomer {
                uid: customer.customer_profile_id.clone(),
            },
            redirect_url,
            signature,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpaymentsChargeResponse {
    pub status: bool,
    pub payment_link: Option<String>,
    pub track_id: Option<String>,
    pub error_message: Option<String>,
}

impl TryFrom<ResponseRouterData<UpaymentsChargeResponse, UpaymentsAuthorizeRouterData>>
    for UpaymentsAuthorizeRouterData
{
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(
        item: ResponseRouterData<UpaymentsChargeResponse, UpaymentsAuthorizeRouterData>,
    ) -> Result<Self, Self::Error> {
        let mut router_data = item.router_data;
        if !item.response.status {
            router_data.resource_common_data.status = AttemptStatus::Failure;
            return Ok(router_data.set_response(Err(ErrorResponse {
                code: consts::NO_ERROR_CODE.to_string(),
                message: item
                    .response
                    .error_message
                    .unwrap_or_else(|| consts::NO_ERROR_MESSAGE.to_string()),
                reason: None,
                status_code: item.http_code,
                connector_transaction_id: item.response.track_id,
            })));
        }
        let payment_link =
            item.response
                .payment_link
                .ok_or(ConnectorError::MissingRequiredField {
                    field_name: "payment_link",
                })?;
        router_data.resource_common_data.status = AttemptStatus::AuthenticationPending;
        let resource_id = match item.response.track_id.clone() {
            Some(track_id) => ResponseId::ConnectorTransactionId(track_id),
            None => ResponseId::NoResponseId,
        };
        Ok(router_data.set_response(Ok(PaymentsResponseData::TransactionResponse {
            resource_id,
            redirection_data: Some(RedirectForm {
                endpoint: payment_link,
                method: Method::Get,
            }),
            connector_response_reference_id: item.response.track_id,
            status_code: item.http_code,
        })))
    }
}

/// Query string of the signed status call.
#[derive(Debug, Serialize)]
pub struct UpaymentsSyncQuery {
    pub merchant_id: Secret<String>,
    pub order_id: String,
    pub signature: Secret<String>,
}

impl TryFrom<&UpaymentsSyncRouterData> for UpaymentsSyncQuery {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: &UpaymentsSyncRouterData) -> Result<Self, Self::Error> {
        let auth = UpaymentsAuthType::try_from(&item.connector_auth_type)?;
        let order_id = item.resource_common_data.merchant_reference.clone();
        let signature = sign(format!(
            "{}{}{}",
            auth.merchant_id.peek(),
            order_id,
            auth.secret_key.peek(),
        ))?;
        Ok(Self {
            merchant_id: auth.merchant_id,
            order_id,
            signature,
        })
    }
}

/// The provider's documented vocabulary is `paid` and `EXPIRED` only;
/// anything else stays `Pending` until a recognized status arrives.
pub fn map_attempt_status(raw_status: &str) -> AttemptStatus {
    match raw_status {
        "paid" => AttemptStatus::Charged,
        "EXPIRED" => AttemptStatus::Expired,
        _ => AttemptStatus::Pending,
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpaymentsSyncResponse {
    pub order_id: String,
    pub status: String,
    pub amount: StringMajorUnit,
    pub track_id: Option<String>,
}

impl TryFrom<ResponseRouterData<UpaymentsSyncResponse, UpaymentsSyncRouterData>>
    for UpaymentsSyncRouterData
{
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(
        item: ResponseRouterData<UpaymentsSyncResponse, UpaymentsSyncRouterData>,
    ) -> Result<Self, Self::Error> {
        let mut router_data = item.router_data;
        router_data.resource_common_data.status = map_attempt_status(&item.response.status);
        let resource_id = match item.response.track_id.clone() {
            Some(track_id) => ResponseId::ConnectorTransactionId(track_id),
            None => ResponseId::ConnectorTransactionId(item.response.order_id),
        };
        Ok(router_data.set_response(Ok(PaymentsResponseData::TransactionResponse {
            resource_id,
            redirection_data: None,
            connector_response_reference_id: item.response.track_id,
            status_code: item.http_code,
        })))
    }
}

#[derive(Debug, Serialize)]
pub struct UpaymentsRefundRequest {
    pub merchant_id: Secret<String>,
    pub track_id: String,
    pub refund_amount: StringMajorUnit,
    pub signature: Secret<String>,
}

impl TryFrom<&UpaymentsRefundRouterData> for UpaymentsRefundRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: &UpaymentsRefundRouterData) -> Result<Self, Self::Error> {
        let auth = UpaymentsAuthType::try_from(&item.connector_auth_type)?;
        let track_id = item.request.connector_transaction_id.clone();
        let refund_amount = utils::convert_amount(
            &StringMajorUnitForConnector,
            item.request.minor_refund_amount,
            item.request.currency,
        )?;
        let signature = sign(format!(
            "{}{}{}{}",
            auth.merchant_id.peek(),
            track_id,
            refund_amount.get_amount_as_string(),
            auth.secret_key.peek(),
        ))?;
        Ok(Self {
            merchant_id: auth.merchant_id,
            track_id,
            refund_amount,
            signature,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpaymentsRefundResponse {
    pub status: bool,
    pub refund_id: String,
}

impl TryFrom<ResponseRouterData<UpaymentsRefundResponse, UpaymentsRefundRouterData>>
    for UpaymentsRefundRouterData
{
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(
        item: ResponseRouterData<UpaymentsRefundResponse, UpaymentsRefundRouterData>,
    ) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let refund_status = if item.response.status {
            RefundStatus::Success
        } else {
            RefundStatus::Failure
        };
        Ok(router_data.set_response(Ok(RefundsResponseData {
            connector_refund_id: item.response.refund_id,
            refund_status,
            status_code: item.http_code,
        })))
    }
}

/// Webhook body as Upayments posts it. The provider sends no signature
/// or secret-derived field; deliveries cannot be authenticated.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpaymentsWebhookPayload {
    pub order_id: String,
    pub status: String,
    pub amount: StringMajorUnit,
    pub currency: Currency,
    pub track_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpaymentsErrorResponse {
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}
