//! Upayments hosted-checkout connector.
//!
//! Requests are signed the same way as the other gateways, but the
//! provider does not sign its webhooks: `verify_webhook_source` always
//! answers `Ok(false)` and deliveries are treated as unauthenticated.
//! Cancel and session-delete have no provider endpoint.

pub mod transformers;

#[cfg(test)]
mod test;

use common_utils::{
    consts,
    errors::CustomResult,
    ext_traits::BytesExt,
    masking::Maskable,
    request::{Method, Request, RequestContent},
    types::{AmountConvertor, StringMajorUnit, StringMajorUnitForConnector},
};
use domain_types::{
    connector_flow::{Authorize, Capture, DeleteSession, PSync, Refund, Void},
    connector_types::{
        EventType, PaymentFlowData, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        PaymentsResponseData, PaymentsSyncData, RefundsData, RefundsResponseData, RequestDetails,
        SessionDeleteData, WebhookDetailsResponse,
    },
    errors::ConnectorError,
    router_data::ErrorResponse,
    router_data_v2::RouterDataV2,
    types::Connectors,
};
use error_stack::ResultExt;
use interfaces::{
    connector_integration_v2::{ConnectorIntegrationV2, Response},
    connector_types::{
        ConnectorCommon, ConnectorServiceTrait, IncomingWebhook, PaymentAuthorizeV2,
        PaymentCaptureV2, PaymentSyncV2, PaymentVoidV2, RefundV2, SessionDeleteV2,
    },
};

use self::transformers as upayments;
use crate::{types::ResponseRouterData, utils};

const CHARGE_ENDPOINT: &str = "api/v1/charge";
const REFUND_ENDPOINT: &str = "api/v1/refund";

#[derive(Clone)]
pub struct Upayments {
    amount_converter: &'static (dyn AmountConvertor<Output = StringMajorUnit> + Sync),
}

impl Upayments {
    pub fn new() -> Self {
        Self {
            amount_converter: &StringMajorUnitForConnector,
        }
    }

    fn endpoint(&self, connectors: &Connectors, path: &str) -> String {
        format!("{}/{path}", self.base_url(connectors).trim_end_matches('/'))
    }
}

impl Default for Upayments {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorCommon for Upayments {
    fn id(&self) -> &'static str {
        "upayments"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        &connectors.upayments.base_url
    }

    fn build_error_response(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError> {
        let response: upayments::UpaymentsErrorResponse = res
            .response
            .parse_struct("UpaymentsErrorResponse")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;
        Ok(ErrorResponse {
            code: response
                .error_code
                .unwrap_or_else(|| consts::NO_ERROR_CODE.to_string()),
            message: response
                .error_message
                .clone()
                .unwrap_or_else(|| consts::NO_ERROR_MESSAGE.to_string()),
            reason: response.error_message,
            status_code: res.status_code,
            connector_transaction_id: None,
        })
    }
}

impl ConnectorIntegrationV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>
    for Upayments
{
    fn get_headers(
        &self,
        _req: &RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        Ok(vec![(
            "Content-Type".to_string(),
            self.common_get_content_type().to_string().into(),
        )])
    }

    fn get_url(
        &self,
        req: &RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
    ) -> CustomResult<String, ConnectorError> {
        Ok(self.endpoint(&req.resource_common_data.connectors, CHARGE_ENDPOINT))
    }

    fn get_request_body(
        &self,
        req: &RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
    ) -> CustomResult<Option<RequestContent>, ConnectorError> {
        let connector_req = upayments::UpaymentsChargeRequest::try_from(req)?;
        Ok(Some(RequestContent::Json(Box::new(connector_req))))
    }

    fn handle_response_v2(
        &self,
        req: &RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        res: Response,
    ) -> CustomResult<
        RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        ConnectorError,
    > {
        let response: upayments::UpaymentsChargeResponse = res
            .response
            .parse_struct("UpaymentsChargeResponse")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;
        RouterDataV2::try_from(ResponseRouterData {
            response,
            router_data: req.clone(),
            http_code: res.status_code,
        })
    }

    fn get_error_response_v2(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError> {
        self.build_error_response(res)
    }
}

impl ConnectorIntegrationV2<PSync, PaymentFlowData, PaymentsSyncData, PaymentsResponseData>
    for Upayments
{
    fn get_http_method(&self) -> Method {
        Method::Get
    }

    fn get_url(
        &self,
        req: &RouterDataV2<PSync, PaymentFlowData, PaymentsSyncData, PaymentsResponseData>,
    ) -> CustomResult<String, ConnectorError> {
        let query = serde_urlencoded::to_string(upayments::UpaymentsSyncQuery::try_from(req)?)
            .change_context(ConnectorError::RequestEncodingFailed)?;
        Ok(format!(
            "{}?{query}",
            self.endpoint(&req.resource_common_data.connectors, CHARGE_ENDPOINT)
        ))
    }

    fn handle_response_v2(
        &self,
        req: &RouterDataV2<PSync, PaymentFlowData, PaymentsSyncData, PaymentsResponseData>,
        res: Response,
    ) -> CustomResult<
        RouterDataV2<PSync, PaymentFlowData, PaymentsSyncData, PaymentsResponseData>,
        ConnectorError,
    > {
        let response: upayments::UpaymentsSyncResponse = res
            .response
            .parse_struct("UpaymentsSyncResponse")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;
        RouterDataV2::try_from(ResponseRouterData {
            response,
            router_data: req.clone(),
            http_code: res.status_code,
        })
    }

    fn get_error_response_v2(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError> {
        self.build_error_response(res)
    }
}

impl ConnectorIntegrationV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>
    for Upayments
{
    // Capture happens on the hosted page and is reported via webhook.
    fn build_request_v2(
        &self,
        _req: &RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
    ) -> CustomResult<Option<Request>, ConnectorError> {
        Ok(None)
    }
}

impl ConnectorIntegrationV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>
    for Upayments
{
    fn build_request_v2(
        &self,
        _req: &RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
    ) -> CustomResult<Option<Request>, ConnectorError> {
        Err(ConnectorError::NotImplemented("cancel flow for upayments".to_string()).into())
    }
}

impl ConnectorIntegrationV2<Refund, PaymentFlowData, RefundsData, RefundsResponseData>
    for Upayments
{
    fn get_headers(
        &self,
        _req: &RouterDataV2<Refund, PaymentFlowData, RefundsData, RefundsResponseData>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        Ok(vec![(
            "Content-Type".to_string(),
            self.common_get_content_type().to_string().into(),
        )])
    }

    fn get_url(
        &self,
        req: &RouterDataV2<Refund, PaymentFlowData, RefundsData, RefundsResponseData>,
    ) -> CustomResult<String, ConnectorError> {
        Ok(self.endpoint(&req.resource_common_data.connectors, REFUND_ENDPOINT))
    }

    fn get_request_body(
        &self,
        req: &RouterDataV2<Refund, PaymentFlowData, RefundsData, RefundsResponseData>,
    ) -> CustomResult<Option<RequestContent>, ConnectorError> {
        let connector_req = upayments::UpaymentsRefundRequest::try_from(req)?;
        Ok(Some(RequestContent::Json(Box::new(connector_req))))
    }

    fn handle_response_v2(
        &self,
        req: &RouterDataV2<Refund, PaymentFlowData, RefundsData, RefundsResponseData>,
        res: Response,
    ) -> CustomResult<
        RouterDataV2<Refund, PaymentFlowData, RefundsData, RefundsResponseData>,
        ConnectorError,
    > {
        let response: upayments::UpaymentsRefundResponse = res
            .response
            .parse_struct("UpaymentsRefundResponse")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;
        RouterDataV2::try_from(ResponseRouterData {
            response,
            router_data: req.clone(),
            http_code: res.status_code,
        })
    }

    fn get_error_response_v2(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError> {
        self.build_error_response(res)
    }
}

impl ConnectorIntegrationV2<DeleteSession, PaymentFlowData, SessionDeleteData, PaymentsResponseData>
    for Upayments
{
    fn build_request_v2(
        &self,
        _req: &RouterDataV2<DeleteSession, PaymentFlowData, SessionDeleteData, PaymentsResponseData>,
    ) -> CustomResult<Option<Request>, ConnectorError> {
        Err(ConnectorError::NotImplemented("delete session flow for upayments".to_string()).into())
    }
}

fn webhook_event_type(raw_status: &str) -> EventType {
    match raw_status {
        "paid" => EventType::Captured,
        "EXPIRED" => EventType::Failed,
        _ => EventType::NotSupported,
    }
}

impl IncomingWebhook for Upayments {
    // The default `verify_webhook_source` answers `Ok(false)`: the
    // provider attaches no signature, so deliveries stay
    // unauthenticated and the caller decides how to treat them.

    fn process_payment_webhook(
        &self,
        request: &RequestDetails,
    ) -> CustomResult<WebhookDetailsResponse, ConnectorError> {
        let payload: upayments::UpaymentsWebhookPayload = request
            .body
            .parse_struct("UpaymentsWebhookPayload")
            .change_context(ConnectorError::WebhookBodyDecodingFailed)?;
        let amount =
            utils::convert_back_amount(self.amount_converter, payload.amount, payload.currency)?;
        Ok(WebhookDetailsResponse {
            event_type: webhook_event_type(&payload.status),
            merchant_reference: payload.order_id,
            amount,
            connector_reference: payload.track_id,
            raw_status: Some(payload.status),
        })
    }
}

impl PaymentAuthorizeV2 for Upayments {}
impl PaymentSyncV2 for Upayments {}
impl PaymentCaptureV2 for Upayments {}
impl PaymentVoidV2 for Upayments {}
impl RefundV2 for Upayments {}
impl SessionDeleteV2 for Upayments {}
impl ConnectorServiceTrait for Upayments {}
