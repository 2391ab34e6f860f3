//! Gateway connectors and the charge-item reconciliation they share.

pub mod connectors;
pub mod reconcile;
pub mod types;
pub mod utils;

pub use types::{ConnectorData, ConnectorEnum};
