//! Common utilities for the gateway adapter service.

pub mod consts;
pub mod crypto;
pub mod errors;
pub mod ext_traits;
pub mod masking;
pub mod request;
pub mod types;
