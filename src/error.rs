//! Gateway error taxonomy.
//!
//! Every failure that can reach the `/generate` handler is one of these
//! variants; the handler converts them into a uniform `{error: ...}`
//! payload at the HTTP boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The requested model identifier is not one of the supported ones.
    #[error("unsupported model: {0}")]
    InvalidModelSelector(String),

    /// The outbound inference call failed (transport, non-success status,
    /// or malformed payload). The message is safe for the caller; raw
    /// backend error bodies stay in local diagnostics only.
    #[error("{0}")]
    BackendCallFailed(String),

    /// The prompt log append failed after a successful generation.
    #[error("failed to append prompt log: {0}")]
    LogWriteFailed(String),
}
