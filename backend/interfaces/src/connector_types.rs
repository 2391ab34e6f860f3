//! Connector capability traits and the incoming-webhook contract.

use common_utils::errors::CustomResult;
use domain_types::{
    connector_flow::{Authorize, Capture, DeleteSession, PSync, Refund, Void},
    connector_types::{
        PaymentFlowData, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        PaymentsResponseData, PaymentsSyncData, RefundsData, RefundsResponseData, RequestDetails,
        SessionDeleteData, WebhookDetailsResponse,
    },
    errors::ConnectorError,
    router_data::{ConnectorAuthType, ErrorResponse},
    types::Connectors,
};

use crate::connector_integration_v2::{ConnectorIntegrationAnyV2, Response};

/// Identity and response-decoding behaviour every connector shares.
pub trait ConnectorCommon {
    /// Name of the connector, as used in config keys and webhook paths.
    fn id(&self) -> &'static str;

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str;

    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, ConnectorError>;
}

pub trait PaymentAuthorizeV2:
    ConnectorIntegrationAnyV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>
{
}

pub trait PaymentSyncV2:
    ConnectorIntegrationAnyV2<PSync, PaymentFlowData, PaymentsSyncData, PaymentsResponseData>
{
}

pub trait PaymentCaptureV2:
    ConnectorIntegrationAnyV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>
{
}

pub trait PaymentVoidV2:
    ConnectorIntegrationAnyV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>
{
}

pub trait RefundV2:
    ConnectorIntegrationAnyV2<Refund, PaymentFlowData, RefundsData, RefundsResponseData>
{
}

pub trait SessionDeleteV2:
    ConnectorIntegrationAnyV2<DeleteSession, PaymentFlowData, SessionDeleteData, PaymentsResponseData>
{
}

/// Decoding and authentication of provider webhook deliveries.
///
/// Decoding must be total and pure: every payload maps to a canonical
/// event (unknown statuses to `NotSupported`), and the same payload
/// bytes always produce the same event, so at-least-once delivery is
/// safe to re-decode.
pub trait IncomingWebhook {
    /// Whether the payload authenticates against the connector's
    /// webhook signature scheme. A signature mismatch is an error;
    /// `Ok(false)` means the provider gives the connector nothing to
    /// verify, and such connectors must document it.
    fn verify_webhook_source(
        &self,
        _request: &RequestDetails,
        _connector_account_details: &ConnectorAuthType,
    ) -> CustomResult<bool, ConnectorError> {
        Ok(false)
    }

    fn process_payment_webhook(
        &self,
        _request: &RequestDetails,
    ) -> CustomResult<WebhookDetailsResponse, ConnectorError> {
        Err(ConnectorError::NotImplemented("process_payment_webhook".to_string()).into())
    }
}

/// The full capability set of a gateway connector.
pub trait ConnectorServiceTrait:
    ConnectorCommon
    + PaymentAuthorizeV2
    + PaymentSyncV2
    + PaymentCaptureV2
    + PaymentVoidV2
    + RefundV2
    + SessionDeleteV2
    + IncomingWebhook
    + Send
    + Sync
{
}

pub type BoxedConnector = Box<dyn ConnectorServiceTrait>;
