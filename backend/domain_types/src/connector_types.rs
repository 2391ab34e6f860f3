//! Flow-specific request/response payloads and the webhook event model.

use std::collections::HashMap;

use common_enums::{AttemptStatus, Currency, RefundStatus};
use common_utils::{
    consts,
    request::Method,
    types::MinorUnit,
};
use serde::{Deserialize, Serialize};

use crate::{
    cart::{CustomerDetails, LineItem},
    errors::{ConnectorError, ReconciliationError},
    types::Connectors,
};

/// Session-scoped data shared by every flow of one checkout attempt.
/// `merchant_reference` is the merchant-issued session id, echoed back
/// by providers in webhooks and used as the correlation key.
#[derive(Debug, Clone)]
pub struct PaymentFlowData {
    pub merchant_reference: String,
    pub currency: Currency,
    pub status: AttemptStatus,
    pub description: Option<String>,
    pub return_url: Option<String>,
    pub customer: Option<CustomerDetails>,
    pub connectors: Connectors,
}

impl PaymentFlowData {
    pub fn get_customer(&self) -> Result<&CustomerDetails, error_stack::Report<ConnectorError>> {
        self.customer.as_ref().ok_or_else(|| {
            ConnectorError::MissingRequiredField {
                field_name: "customer",
            }
            .into()
        })
    }

    pub fn get_return_url(&self) -> Result<String, error_stack::Report<ConnectorError>> {
        self.return_url.clone().ok_or_else(|| {
            ConnectorError::MissingRequiredField {
                field_name: "return_url",
            }
            .into()
        })
    }
}

/// Provider-assigned identifier of a transaction.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum ResponseId {
    ConnectorTransactionId(String),
    NoResponseId,
}

impl ResponseId {
    pub fn get_connector_transaction_id(
        &self,
    ) -> Result<String, error_stack::Report<ConnectorError>> {
        match self {
            Self::ConnectorTransactionId(id) => Ok(id.clone()),
            Self::NoResponseId => Err(ConnectorError::MissingConnectorTransactionID.into()),
        }
    }
}

/// Redirect the customer to the provider's hosted page.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct RedirectForm {
    pub endpoint: String,
    pub method: Method,
}

/// One line entry sent to a payment provider. Derived from the cart on
/// every initiate call; never persisted.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ChargeItem {
    pub id: String,
    pub description: String,
    pub unit_price: MinorUnit,
    pub quantity: u16,
    pub image_url: Option<String>,
}

impl ChargeItem {
    /// Price the item contributes to the provider-side total.
    pub fn line_total(&self) -> Result<MinorUnit, error_stack::Report<ReconciliationError>> {
        self.unit_price
            .checked_mul_quantity(self.quantity)
            .ok_or_else(|| ReconciliationError::AmountOverflow.into())
    }

    pub fn is_adjustment(&self) -> bool {
        self.id == consts::AMOUNT_DIFFERENCE_ITEM_ID
    }
}

impl From<&LineItem> for ChargeItem {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.clone(),
            description: item.title.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            image_url: item.thumbnail.as_ref().map(|u| u.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentsAuthorizeData {
    pub minor_amount: MinorUnit,
    pub currency: Currency,
    pub order_details: Vec<LineItem>,
    pub router_return_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PaymentsSyncData {
    pub connector_transaction_id: ResponseId,
}

#[derive(Debug, Clone)]
pub struct PaymentsCaptureData {
    pub minor_amount_to_capture: MinorUnit,
    pub currency: Currency,
    pub connector_transaction_id: String,
}

#[derive(Debug, Clone)]
pub struct PaymentVoidData {
    pub connector_transaction_id: String,
    pub cancellation_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SessionDeleteData {
    pub connector_session_id: String,
}

#[derive(Debug, Clone)]
pub struct RefundsData {
    pub refund_id: String,
    pub minor_refund_amount: MinorUnit,
    pub currency: Currency,
    /// Provider-native reference obtained through the retrieve leg.
    pub connector_transaction_id: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub enum PaymentsResponseData {
    TransactionResponse {
        resource_id: ResponseId,
        redirection_data: Option<RedirectForm>,
        connector_response_reference_id: Option<String>,
        status_code: u16,
    },
}

impl PaymentsResponseData {
    pub fn get_connector_reference(&self) -> Option<String> {
        match self {
            Self::TransactionResponse {
                connector_response_reference_id,
                ..
            } => connector_response_reference_id.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RefundsResponseData {
    pub connector_refund_id: String,
    pub refund_status: RefundStatus,
    pub status_code: u16,
}

/// Raw inbound webhook call as received on the wire.
#[derive(Debug, Clone)]
pub struct RequestDetails {
    pub headers: HashMap<String, String>,
    pub body: bytes::Bytes,
}

/// Canonical action of a provider webhook; unknown provider statuses
/// map to `NotSupported` rather than failing.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    Authorized,
    Captured,
    Failed,
    NotSupported,
}

/// Provider-agnostic representation of one webhook delivery, handed to
/// the payment module that owns the session state machine. The amount
/// is the provider's reported amount, never recomputed locally.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct WebhookDetailsResponse {
    pub event_type: EventType,
    pub merchant_reference: String,
    pub amount: MinorUnit,
    pub connector_reference: Option<String>,
    /// Raw provider status string, kept for logging.
    pub raw_status: Option<String>,
}
