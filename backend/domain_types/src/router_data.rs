use common_utils::masking::Secret;
use serde::{Deserialize, Serialize};

/// Credentials handed to a connector. Which variant a connector
/// accepts is decided by its `TryFrom<&ConnectorAuthType>` impl.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "auth_type")]
pub enum ConnectorAuthType {
    HeaderKey {
        api_key: Secret<String>,
    },
    SignatureKey {
        merchant_id: Secret<String>,
        secret_key: Secret<String>,
    },
}

/// Error reported by a gateway, normalized across providers. The raw
/// provider body travels in `reason` for logging, never to customers.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub reason: Option<String>,
    pub status_code: u16,
    pub connector_transaction_id: Option<String>,
}
