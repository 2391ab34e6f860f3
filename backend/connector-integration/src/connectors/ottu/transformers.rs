use common_enums::{AttemptStatus, Currency, RefundStatus};
use common_utils::{
    crypto::generate_hex_sha256,
    masking::{PeekInterface, Secret},
    request::Method,
    types::{StringMajorUnit, StringMajorUnitForConnector},
};
use domain_types::{
    connector_flow::{Authorize, DeleteSession, PSync, Refund, Void},
    connector_types::{
        ChargeItem, PaymentFlowData, PaymentVoidData, PaymentsAuthorizeData, PaymentsResponseData,
        PaymentsSyncData, RedirectForm, RefundsData, RefundsResponseData, ResponseId,
        SessionDeleteData,
    },
    errors::ConnectorError,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
};
use error_stack::ResultExt;
use serde::{Deserialize, Serialize};

use super::constants;
use crate::{reconcile::reconcile, types::ResponseRouterData, utils};

type OttuAuthorizeRouterData =
    RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>;
type OttuSyncRouterData =
    RouterDataV2<PSync, PaymentFlowData, PaymentsSyncData, PaymentsResponseData>;
type OttuVoidRouterData =
    RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>;
type OttuRefundRouterData =
    RouterDataV2<Refund, PaymentFlowData, RefundsData, RefundsResponseData>;
type OttuDeleteSessionRouterData =
    RouterDataV2<DeleteSession, PaymentFlowData, SessionDeleteData, PaymentsResponseData>;

pub struct OttuAuthType {
    pub merchant_id: Secret<String>,
    pub secret_key: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for OttuAuthType {
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
pub struct OttuChargeItem {
    pub product_id: String,
    pub description: String,
    pub quantity: u16,
    pub unit_price: StringMajorUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl OttuChargeItem {
    fn try_from_charge_item(
        item: &ChargeItem,
        currency: Currency,
    ) -> Result<Self, error_stack::Report<ConnectorError>> {
        Ok(Self {
            product_id: item.id.clone(),
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price: utils::convert_amount(
                &StringMajorUnitForConnector,
                item.unit_price,
                currency,
            )?,
            image_url: item.image_url.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct OttuPaymentsRequest {
    pub merchant_id: Secret<String>,
    pub merchant_reference: String,
    pub customer_profile_id: String,
    pub currency: Currency,
    pub amount: StringMajorUnit,
    pub return_url: String,
    pub charge_items: Vec<OttuChargeItem>,
    pub signature: Secret<String>,
}

impl TryFrom<&OttuAuthorizeRouterData> for OttuPaymentsRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: &OttuAuthorizeRouterData) -> Result<Self, Self::Error> {
        let auth = OttuAuthType::try_from(&item.connector_auth_type)?;
        let customer = item.resource_common_data.get_customer()?;
        let return_url = match item.request.router_return_url.clone() {
            Some(url) => url,
            None => item.resource_common_data.get_return_url()?,
        };
        let currency = item.request.currency;

        let mut charge_items = reconcile(item.request.minor_amount, &item.request.order_details)
            .change_context(ConnectorError::AmountConversionFailed)?;
        // Ottu computes the signature over items in ascending id order;
        // the body must carry them in the same order.
        charge_items.sort_by(|a, b| a.id.cmp(&b.id));

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
            return_url,
            serialized_items,
            auth.secret_key.peek(),
        ))?;

        Ok(Self {
            merchant_id: auth.merchant_id,
            merchant_reference,
            customer_profile_id: customer.customer_profile_id.clone(),
            currency,
            amount: utils::convert_amount(
                &StringMajorUnitForConnector,
                item.request.minor_amount,
                currency,
            )?,
            return_url,
            charge_items: charge_items
                .iter()
                .map(|charge_item| OttuChargeItem::try_from_charge_item(charge_item, currency))
                .collect::<Result<Vec<_>, _>>()?,
            signature,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OttuPaymentsResponse {
    pub session_id: String,
    pub checkout_url: String,
}

impl TryFrom<ResponseRouterData<OttuPaymentsResponse, OttuAuthorizeRouterData>>
    for OttuAuthorizeRouterData
{
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(
        item: ResponseRouterData<OttuPaymentsResponse, OttuAuthorizeRouterData>,
    ) -> Result<Self, Self::Error> {
        let mut router_data = item.router_data;
        router_data.resource_common_data.status = AttemptStatus::AuthenticationPending;
        Ok(router_data.set_response(Ok(PaymentsResponseData::TransactionResponse {
            resource_id: ResponseId::ConnectorTransactionId(item.response.session_id),
            redirection_data: Some(RedirectForm {
                endpoint: item.response.checkout_url,
                method: Method::Get,
            }),
            connector_response_reference_id: None,
            status_code: item.http_code,
        })))
    }
}

/// Query string of the signed retrieve call.
#[derive(Debug, Serialize)]
pub struct OttuSyncQuery {
    pub merchant_id: Secret<String>,
    pub merchant_reference: String,
    pub signature: Secret<String>,
}

impl TryFrom<&OttuSyncRouterData> for OttuSyncQuery {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: &OttuSyncRouterData) -> Result<Self, Self::Error> {
        let auth = OttuAuthType::try_from(&item.connector_auth_type)?;
        let merchant_reference = item.resource_common_data.merchant_reference.clone();
        let signature = sign(format!(
            "{}{}{}",
            auth.merchant_id.peek(),
            merchant_reference,
            auth.secret_key.peek(),
        ))?;
        Ok(Self {
            merchant_id: auth.merchant_id,
            merchant_reference,
            signature,
        })
    }
}

pub fn map_attempt_status(raw_status: &str) -> AttemptStatus {
    match raw_status {
        constants::STATUS_NEW => AttemptStatus::Authorized,
        constants::STATUS_PAID => AttemptStatus::Charged,
        constants::STATUS_FAILED => AttemptStatus::Failure,
        constants::STATUS_EXPIRED => AttemptStatus::Expired,
        _ => AttemptStatus::Pending,
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OttuSyncResponse {
    pub merchant_reference: String,
    pub status: String,
    pub amount: StringMajorUnit,
    /// Provider-native transaction reference, assigned once the
    /// customer reaches the hosted page. Refunds are keyed on it.
    pub reference_number: Option<String>,
}

impl TryFrom<ResponseRouterData<OttuSyncResponse, OttuSyncRouterData>> for OttuSyncRouterData {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(
        item: ResponseRouterData<OttuSyncResponse, OttuSyncRouterData>,
    ) -> Result<Self, Self::Error> {
        let mut router_data = item.router_data;
        router_data.resource_common_data.status = map_attempt_status(&item.response.status);
        let resource_id = match item.response.reference_number.clone() {
            Some(reference_number) => ResponseId::ConnectorTransactionId(reference_number),
            None => ResponseId::ConnectorTransactionId(item.response.merchant_reference),
        };
        Ok(router_data.set_response(Ok(PaymentsResponseData::TransactionResponse {
            resource_id,
            redirection_data: None,
            connector_response_reference_id: item.response.reference_number,
            status_code: item.http_code,
        })))
    }
}

#[derive(Debug, Serialize)]
pub struct OttuCancelRequest {
    pub merchant_id: Secret<String>,
    pub merchant_reference: String,
    pub signature: Secret<String>,
}

impl TryFrom<&OttuVoidRouterData> for OttuCancelRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: &OttuVoidRouterData) -> Result<Self, Self::Error> {
        let auth = OttuAuthType::try_from(&item.connector_auth_type)?;
        let merchant_reference = item.resource_common_data.merchant_reference.clone();
        let signature = sign(format!(
            "{}{}{}",
            auth.merchant_id.peek(),
            merchant_reference,
            auth.secret_key.peek(),
        ))?;
        Ok(Self {
            merchant_id: auth.merchant_id,
            merchant_reference,
            signature,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OttuCancelResponse {
    pub status: String,
}

impl TryFrom<ResponseRouterData<OttuCancelResponse, OttuVoidRouterData>> for OttuVoidRouterData {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(
        item: ResponseRouterData<OttuCancelResponse, OttuVoidRouterData>,
    ) -> Result<Self, Self::Error> {
        let mut router_data = item.router_data;
        router_data.resource_common_data.status = AttemptStatus::Voided;
        let connector_transaction_id = router_data.request.connector_transaction_id.clone();
        Ok(router_data.set_response(Ok(PaymentsResponseData::TransactionResponse {
            resource_id: ResponseId::ConnectorTransactionId(connector_transaction_id),
            redirection_data: None,
            connector_response_reference_id: None,
            status_code: item.http_code,
        })))
    }
}

#[derive(Debug, Serialize)]
pub struct OttuRefundRequest {
    pub merchant_id: Secret<String>,
    pub reference_number: String,
    pub refund_amount: StringMajorUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub signature: Secret<String>,
}

impl TryFrom<&OttuRefundRouterData> for OttuRefundRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: &OttuRefundRouterData) -> Result<Self, Self::Error> {
        let auth = OttuAuthType::try_from(&item.connector_auth_type)?;
        // The provider reference from the retrieve leg, not the
        // merchant reference.
        let reference_number = item.request.connector_transaction_id.clone();
        let refund_amount = utils::convert_amount(
            &StringMajorUnitForConnector,
            item.request.minor_refund_amount,
            item.request.currency,
        )?;
        let signature = sign(format!(
            "{}{}{}{}",
            auth.merchant_id.peek(),
            reference_number,
            refund_amount.get_amount_as_string(),
            auth.secret_key.peek(),
        ))?;
        Ok(Self {
            merchant_id: auth.merchant_id,
            reference_number,
            refund_amount,
            reason: item.request.reason.clone(),
            signature,
        })
    }
}

pub fn map_refund_status(raw_status: &str) -> RefundStatus {
    match raw_status {
        "SUCCESS" => RefundStatus::Success,
        "PENDING" => RefundStatus::Pending,
        _ => RefundStatus::Failure,
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OttuRefundResponse {
    pub refund_id: String,
    pub status: String,
}

impl TryFrom<ResponseRouterData<OttuRefundResponse, OttuRefundRouterData>>
    for OttuRefundRouterData
{
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(
        item: ResponseRouterData<OttuRefundResponse, OttuRefundRouterData>,
    ) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        Ok(router_data.set_response(Ok(RefundsResponseData {
            connector_refund_id: item.response.refund_id,
            refund_status: map_refund_status(&item.response.status),
            status_code: item.http_code,
        })))
    }
}

/// Query string of the signed session-delete call. Same message shape
/// as the retrieve signature, keyed on the provider session id.
#[derive(Debug, Serialize)]
pub struct OttuDeleteSessionQuery {
    pub merchant_id: Secret<String>,
    pub merchant_reference: String,
    pub signature: Secret<String>,
}

impl TryFrom<&OttuDeleteSessionRouterData> for OttuDeleteSessionQuery {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: &OttuDeleteSessionRouterData) -> Result<Self, Self::Error> {
        let auth = OttuAuthType::try_from(&item.connector_auth_type)?;
        let merchant_reference = item.request.connector_session_id.clone();
        let signature = sign(format!(
            "{}{}{}",
            auth.merchant_id.peek(),
            merchant_reference,
            auth.secret_key.peek(),
        ))?;
        Ok(Self {
            merchant_id: auth.merchant_id,
            merchant_reference,
            signature,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OttuDeleteSessionResponse {
    pub status: String,
}

impl TryFrom<ResponseRouterData<OttuDeleteSessionResponse, OttuDeleteSessionRouterData>>
    for OttuDeleteSessionRouterData
{
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(
        item: ResponseRouterData<OttuDeleteSessionResponse, OttuDeleteSessionRouterData>,
    ) -> Result<Self, Self::Error> {
        let router_data = item.router_data;
        let connector_session_id = router_data.request.connector_session_id.clone();
        Ok(router_data.set_response(Ok(PaymentsResponseData::TransactionResponse {
            resource_id: ResponseId::ConnectorTransactionId(connector_session_id),
            redirection_data: None,
            connector_response_reference_id: None,
            status_code: item.http_code,
        })))
    }
}

/// Webhook body as Ottu posts it. The signature field is mandatory;
/// deliveries without it are rejected before decoding.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OttuWebhookPayload {
    pub merchant_reference: String,
    pub status: String,
    pub amount: StringMajorUnit,
    pub currency: Currency,
    pub reference_number: Option<String>,
    pub signature: Option<Secret<String>>,
}

impl OttuWebhookPayload {
    /// Message Ottu signs a webhook delivery with.
    pub fn signature_message(&self, auth: &OttuAuthType) -> String {
        format!(
            "{}{}{}{}{}",
            auth.merchant_id.peek(),
            self.merchant_reference,
            self.amount.get_amount_as_string(),
            self.status,
            auth.secret_key.peek(),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OttuErrorResponse {
    pub code: Option<String>,
    pub message: Option<String>,
}
