//! Outbound I/O of the gateway adapter: the HTTP client the connectors
//! speak through and the read port onto the order module's carts.

pub mod cart_reader;
pub mod service;
