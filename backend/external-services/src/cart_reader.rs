//! HTTP implementation of the order module's cart read port.

use std::time::Duration;

use common_utils::{consts, errors::CustomResult};
use domain_types::cart::{CartReadError, CartReader, CartSnapshot};
use error_stack::ResultExt;
use reqwest::Client;

/// Reads cart snapshots from the order module over its internal HTTP
/// API. One client instance is shared across requests.
pub struct HttpCartReader {
    base_url: String,
    client: Client,
}

impl HttpCartReader {
    pub fn new(base_url: String) -> CustomResult<Self, CartReadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(consts::REQUEST_TIMEOUT_SECS))
            .build()
            .change_context(CartReadError::CommunicationFailure)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl CartReader for HttpCartReader {
    async fn get(&self, cart_id: &str) -> CustomResult<CartSnapshot, CartReadError> {
        let url = format!("{}/carts/{cart_id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .change_context(CartReadError::CommunicationFailure)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CartReadError::NotFound {
                cart_id: cart_id.to_string(),
            }
            .into());
        }
        if !response.status().is_success() {
            return Err(CartReadError::CommunicationFailure.into());
        }

        response
            .json::<CartSnapshot>()
            .await
            .change_context(CartReadError::MalformedSnapshot)
    }
}
