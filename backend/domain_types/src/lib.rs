//! Domain types shared between the gateway connectors and the service
//! layer: flow markers, per-flow request/response payloads, the cart
//! read-model port and the error taxonomy.

pub mod cart;
pub mod connector_flow;
pub mod connector_types;
pub mod errors;
pub mod router_data;
pub mod router_data_v2;
pub mod types;
