//! Connector account configuration.

use common_utils::masking::{PeekInterface, Secret};
use serde::Deserialize;

/// Account parameters for one gateway. `secret_key` signs requests and
/// webhook checks; it never appears in logs or error output.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ConnectorParams {
    pub base_url: String,
    pub merchant_id: Secret<String>,
    pub secret_key: Secret<String>,
    pub return_url: String,
}

impl ConnectorParams {
    /// Fail-fast validation, naming the first missing field.
    pub fn validate(&self, connector: &str) -> Result<(), String> {
        let fields: [(&str, &str); 4] = [
            ("base_url", &self.base_url),
            ("merchant_id", self.merchant_id.peek()),
            ("secret_key", self.secret_key.peek()),
            ("return_url", &self.return_url),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(format!("{connector}.{name} must be set"));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Connectors {
    pub ottu: ConnectorParams,
    pub upayments: ConnectorParams,
}

/// Outbound proxy configuration for the reqwest client.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_names_the_missing_field() {
        let params = ConnectorParams {
            base_url: "https://api.example.com".to_string(),
            merchant_id: Secret::new("merchant_1".to_string()),
            secret_key: Secret::new(String::new()),
            return_url: "https://shop.example.com/return".to_string(),
        };
        let err = params.validate("ottu").expect_err("must fail");
        assert_eq!(err, "ottu.secret_key must be set");
    }

    #[test]
    fn complete_params_pass_validation() {
        let params = ConnectorParams {
            base_url: "https://api.example.com".to_string(),
            merchant_id: Secret::new("merchant_1".to_string()),
            secret_key: Secret::new("s3cr3t".to_string()),
            return_url: "https://shop.example.com/return".to_string(),
        };
        assert!(params.validate("ottu").is_ok());
    }
}
