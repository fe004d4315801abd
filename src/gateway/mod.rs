//! HTTP surface of the gateway.

pub mod handlers;
pub mod router;
pub mod types;
