//! Ottu API paths, relative to the configured base URL.

pub const PAYMENT_ENDPOINT: &str = "checkout/v1/payment";
pub const REFUND_ENDPOINT: &str = "checkout/v1/refund";

/// Webhook statuses with a canonical meaning. Anything else decodes to
/// `NotSupported`.
pub const STATUS_NEW: &str = "NEW";
pub const STATUS_PAID: &str = "PAID";
pub const STATUS_FAILED: &str = "FAILED";
pub const STATUS_EXPIRED: &str = "EXPIRED";
