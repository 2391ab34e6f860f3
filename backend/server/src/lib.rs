//! HTTP surface of the gateway adapter: configuration, logging and the
//! axum routes for merchant-initiated operations and inbound provider
//! webhooks.

pub mod configs;
pub mod error;
pub mod http;
pub mod logger;
