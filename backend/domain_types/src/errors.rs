//! Error taxonomy of the gateway adapter layer.

/// Failures raised while talking to a gateway or interpreting what it
/// said. `ProcessingStepFailed` carries the raw provider body so the
/// caller can log it and decide on retries; none of these are shown to
/// end customers directly.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("Error while obtaining URL for the integration")]
    FailedToObtainIntegrationUrl,
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    #[error("Failed to execute a processing step: {0:?}")]
    ProcessingStepFailed(Option<bytes::Bytes>),
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },
    #[error("Failed to obtain authentication type")]
    FailedToObtainAuthType,
    #[error("This step has not been implemented for: {0}")]
    NotImplemented(String),
    #[error("Failed to convert amount to the connector representation")]
    AmountConversionFailed,
    #[error("Missing connector transaction ID")]
    MissingConnectorTransactionID,
    #[error("The connector has no record of the payment")]
    PaymentNotFound,
    #[error("Failed to decode webhook event body")]
    WebhookBodyDecodingFailed,
    #[error("Signature not found for incoming webhook")]
    WebhookSignatureNotFound,
    #[error("Failed to verify webhook source")]
    WebhookSourceVerificationFailed,
    #[error("An invalid connector name was provided")]
    InvalidConnectorName,
}

/// Transport-level failures of the outbound HTTP client, separate from
/// what the gateway answered.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("Failed to construct the HTTP client")]
    ClientConstructionFailed,
    #[error("Invalid proxy configuration")]
    InvalidProxyConfiguration,
    #[error("URL encoding of the request failed")]
    UrlEncodingFailed,
    #[error("Failed to construct the request header map")]
    HeaderMapConstructionFailed,
    #[error("Failed to send the request to the connector: {0}")]
    RequestNotSent(String),
    #[error("The connector did not respond within the request timeout")]
    RequestTimeoutReceived,
    #[error("Failed to read the response body")]
    ResponseDecodingFailed,
}

/// Reconciliation cannot fail on well-formed input; this guards the
/// arithmetic against malformed cart amounts.
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    #[error("Charge item amounts overflowed while computing the itemized total")]
    AmountOverflow,
}
