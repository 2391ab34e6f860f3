//! Trait seams between the service layer and the gateway connectors.

pub mod connector_integration_v2;
pub mod connector_types;

pub use connector_types::{BoxedConnector, ConnectorServiceTrait};
