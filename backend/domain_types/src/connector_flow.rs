//! Marker types for the gateway flows. Each flow parameterizes
//! [`crate::router_data_v2::RouterDataV2`] and selects one
//! `ConnectorIntegrationV2` impl on a connector.

/// Checkout initiation: create a hosted-checkout session with the
/// provider and obtain the redirect URL.
#[derive(Debug, Clone)]
pub struct Authorize;

/// Payment status retrieval, also the first leg of the refund flow.
#[derive(Debug, Clone)]
pub struct PSync;

/// Capture bookkeeping. Hosted-checkout providers capture server-side,
/// so connectors typically echo input here.
#[derive(Debug, Clone)]
pub struct Capture;

/// Cancellation of a not-yet-captured checkout session.
#[derive(Debug, Clone)]
pub struct Void;

/// Merchant-initiated, possibly partial, refund.
#[derive(Debug, Clone)]
pub struct Refund;

/// Deletion of a checkout session at the provider.
#[derive(Debug, Clone)]
pub struct DeleteSession;
