//! Ottu hosted-checkout connector.
//!
//! Every call carries a SHA-256 hex signature computed over
//! flow-specific fields plus the shared secret. Webhooks are signed
//! with the same secret and deliveries that fail verification are
//! rejected.

pub mod constants;
pub mod transformers;

#[cfg(test)]
mod test;

use common_utils::{
    consts,
    crypto::generate_hex_sha256,
    errors::CustomResult,
    ext_traits::BytesExt,
    masking::{Maskable, PeekInterface},
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
    router_data::{ConnectorAuthType, ErrorResponse},
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

use self::transformers as ottu;
use crate::{types::ResponseRouterData, utils};

#[derive(Clone)]
pub struct Ottu {
    amount_converter: &'static (dyn AmountConvertor<Output = StringMajorUnit> + Sync),
}

impl Ottu {
    pub fn new() -> Self {
        Self {
            amount_converter: &StringMajorUnitForConnector,
        }
    }

    fn endpoint(&self, connectors: &Connectors, path: &str) -> String {
        format!("{}/{path}", self.base_url(connectors).trim_end_matches('/'))
    }
}

impl Default for Ottu {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorCommon for Ottu {
    fn id(&self) -> &'static str {
        "ottu"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        &connectors.ottu.base_url
    }

    fn build_error_response(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError> {
        let response: ottu::OttuErrorResponse = res
            .response
            .parse_struct("OttuErrorResponse")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;
        Ok(ErrorResponse {
            code: response
                .code
                .unwrap_or_else(|| consts::NO_ERROR_CODE.to_string()),
            message: response
                .message
                .clone()
                .unwrap_or_else(|| consts::NO_ERROR_MESSAGE.to_string()),
            reason: response.message,
            status_code: res.status_code,
            connector_transaction_id: None,
        })
    }
}

impl ConnectorIntegrationV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>
    for Ottu
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
        Ok(self.endpoint(
            &req.resource_common_data.connectors,
            constants::PAYMENT_ENDPOINT,
        ))
    }

    fn get_request_body(
        &self,
        req: &RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
    ) -> CustomResult<Option<RequestContent>, ConnectorError> {
        let connector_req = ottu::OttuPaymentsRequest::try_from(req)?;
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
        let response: ottu::OttuPaymentsResponse = res
            .response
            .parse_struct("OttuPaymentsResponse")
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
    for Ottu
{
    fn get_http_method(&self) -> Method {
        Method::Get
    }

    fn get_url(
        &self,
        req: &RouterDataV2<PSync, PaymentFlowData, PaymentsSyncData, PaymentsResponseData>,
    ) -> CustomResult<String, ConnectorError> {
        let query = serde_urlencoded::to_string(ottu::OttuSyncQuery::try_from(req)?)
            .change_context(ConnectorError::RequestEncodingFailed)?;
        Ok(format!(
            "{}?{query}",
            self.endpoint(
                &req.resource_common_data.connectors,
                constants::PAYMENT_ENDPOINT,
            )
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
        let response: ottu::OttuSyncResponse = res
            .response
            .parse_struct("OttuSyncResponse")
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
    for Ottu
{
    // Capture happens on the hosted page; the provider reports it via
    // webhook. No outbound call to build, the executor echoes the
    // input for bookkeeping.
    fn build_request_v2(
        &self,
        _req: &RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
    ) -> CustomResult<Option<Request>, ConnectorError> {
        Ok(None)
    }
}

impl ConnectorIntegrationV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData> for Ottu {
    fn get_headers(
        &self,
        _req: &RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        Ok(vec![(
            "Content-Type".to_string(),
            self.common_get_content_type().to_string().into(),
        )])
    }

    fn get_url(
        &self,
        req: &RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
    ) -> CustomResult<String, ConnectorError> {
        Ok(format!(
            "{}/{}/cancel",
            self.endpoint(
                &req.resource_common_data.connectors,
                constants::PAYMENT_ENDPOINT,
            ),
            req.resource_common_data.merchant_reference,
        ))
    }

    fn get_request_body(
        &self,
        req: &RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
    ) -> CustomResult<Option<RequestContent>, ConnectorError> {
        let connector_req = ottu::OttuCancelRequest::try_from(req)?;
        Ok(Some(RequestContent::Json(Box::new(connector_req))))
    }

    fn handle_response_v2(
        &self,
        req: &RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        res: Response,
    ) -> CustomResult<
        RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        ConnectorError,
    > {
        let response: ottu::OttuCancelResponse = res
            .response
            .parse_struct("OttuCancelResponse")
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

impl ConnectorIntegrationV2<Refund, PaymentFlowData, RefundsData, RefundsResponseData> for Ottu {
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
        Ok(self.endpoint(
            &req.resource_common_data.connectors,
            constants::REFUND_ENDPOINT,
        ))
    }

    fn get_request_body(
        &self,
        req: &RouterDataV2<Refund, PaymentFlowData, RefundsData, RefundsResponseData>,
    ) -> CustomResult<Option<RequestContent>, ConnectorError> {
        let connector_req = ottu::OttuRefundRequest::try_from(req)?;
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
        let response: ottu::OttuRefundResponse = res
            .response
            .parse_struct("OttuRefundResponse")
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
    for Ottu
{
    fn get_http_method(&self) -> Method {
        Method::Delete
    }

    fn get_url(
        &self,
        req: &RouterDataV2<DeleteSession, PaymentFlowData, SessionDeleteData, PaymentsResponseData>,
    ) -> CustomResult<String, ConnectorError> {
        let query = serde_urlencoded::to_string(ottu::OttuDeleteSessionQuery::try_from(req)?)
            .change_context(ConnectorError::RequestEncodingFailed)?;
        Ok(format!(
            "{}/{}?{query}",
            self.endpoint(
                &req.resource_common_data.connectors,
                constants::PAYMENT_ENDPOINT,
            ),
            req.request.connector_session_id,
        ))
    }

    fn handle_response_v2(
        &self,
        req: &RouterDataV2<DeleteSession, PaymentFlowData, SessionDeleteData, PaymentsResponseData>,
        res: Response,
    ) -> CustomResult<
        RouterDataV2<DeleteSession, PaymentFlowData, SessionDeleteData, PaymentsResponseData>,
        ConnectorError,
    > {
        let response: ottu::OttuDeleteSessionResponse = res
            .response
            .parse_struct("OttuDeleteSessionResponse")
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

fn webhook_event_type(raw_status: &str) -> EventType {
    match raw_status {
        constants::STATUS_NEW => EventType::Authorized,
        constants::STATUS_PAID => EventType::Captured,
        constants::STATUS_FAILED | constants::STATUS_EXPIRED => EventType::Failed,
        _ => EventType::NotSupported,
    }
}

impl IncomingWebhook for Ottu {
    fn verify_webhook_source(
        &self,
        request: &RequestDetails,
        connector_account_details: &ConnectorAuthType,
    ) -> CustomResult<bool, ConnectorError> {
        let payload: ottu::OttuWebhookPayload = request
            .body
            .parse_struct("OttuWebhookPayload")
            .change_context(ConnectorError::WebhookBodyDecodingFailed)?;
        let signature = payload
            .signature
            .clone()
            .ok_or(ConnectorError::WebhookSignatureNotFound)?;
        let auth = ottu::OttuAuthType::try_from(connector_account_details)?;
        let expected = generate_hex_sha256(payload.signature_message(&auth).as_bytes())
            .change_context(ConnectorError::WebhookSourceVerificationFailed)?;
        if expected != *signature.peek() {
            return Err(ConnectorError::WebhookSourceVerificationFailed.into());
        }
        Ok(true)
    }

    fn process_payment_webhook(
        &self,
        request: &RequestDetails,
    ) -> CustomResult<WebhookDetailsResponse, ConnectorError> {
        let payload: ottu::OttuWebhookPayload = request
            .body
            .parse_struct("OttuWebhookPayload")
            .change_context(ConnectorError::WebhookBodyDecodingFailed)?;
        let amount =
            utils::convert_back_amount(self.amount_converter, payload.amount, payload.currency)?;
        Ok(WebhookDetailsResponse {
            event_type: webhook_event_type(&payload.status),
            merchant_reference: payload.merchant_reference,
            amount,
            connector_reference: payload.reference_number,
            raw_status: Some(payload.status),
        })
    }
}

impl PaymentAuthorizeV2 for Ottu {}
impl PaymentSyncV2 for Ottu {}
impl PaymentCaptureV2 for Ottu {}
impl PaymentVoidV2 for Ottu {}
impl RefundV2 for Ottu {}
impl SessionDeleteV2 for Ottu {}
impl ConnectorServiceTrait for Ottu {}
