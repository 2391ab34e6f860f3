//! Service-wide constants.

/// Identifier of the synthetic charge item appended when the itemized
/// sum disagrees with the authoritative order total.
pub const AMOUNT_DIFFERENCE_ITEM_ID: &str = "amount_difference";

/// Default timeout applied to outbound gateway calls, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Placeholder used when a gateway error response carries no code.
pub const NO_ERROR_CODE: &str = "No error code";

/// Placeholder used when a gateway error response carries no message.
pub const NO_ERROR_MESSAGE: &str = "No error message";

/// Prefix for environment variable configuration overrides.
pub const ENV_PREFIX: &str = "GATEWAY";
