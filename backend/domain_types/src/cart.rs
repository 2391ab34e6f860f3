//! Read-only port onto the order module's cart read model. The core
//! never issues its own queries; it asks this port for a snapshot and
//! derives provider charge items from it.

use common_enums::Currency;
use common_utils::{errors::CustomResult, masking::Secret, types::MinorUnit};
use serde::{Deserialize, Serialize};

/// One priced cart line as the order module reports it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct LineItem {
    pub id: String,
    pub title: String,
    pub unit_price: MinorUnit,
    pub quantity: u16,
    pub thumbnail: Option<url::Url>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CustomerDetails {
    pub customer_profile_id: String,
    pub email: Option<Secret<String>>,
    pub name: Option<Secret<String>>,
    pub phone: Option<Secret<String>>,
}

/// Snapshot of a cart at checkout time. `authoritative_total` is the
/// amount the customer must be charged; the line items need not sum to
/// it (shipping, cart-level discounts).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CartSnapshot {
    pub cart_id: String,
    pub customer: CustomerDetails,
    pub items: Vec<LineItem>,
    pub authoritative_total: MinorUnit,
    pub currency: Currency,
}

#[derive(Debug, thiserror::Error)]
pub enum CartReadError {
    #[error("No cart found for id {cart_id}")]
    NotFound { cart_id: String },
    #[error("Failed to reach the order module")]
    CommunicationFailure,
    #[error("Order module returned an unreadable cart payload")]
    MalformedSnapshot,
}

/// Read access to the order module's cart state.
#[async_trait::async_trait]
pub trait CartReader: Send + Sync {
    async fn get(&self, cart_id: &str) -> CustomResult<CartSnapshot, CartReadError>;
}
