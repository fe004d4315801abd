//! Gateway request/response types.

use serde::{Deserialize, Serialize};

use crate::backend::router::ModelId;

/// Query parameters of `POST /generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    pub model: ModelId,
}

/// JSON body of `POST /generate`.
#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

/// Success payload.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub model: String,
    pub prompt: String,
    pub response: String,
    pub token_count: u32,
    pub latency_ms: f64,
}

/// Failure payload. Always returned with a 200 status; callers
/// distinguish outcomes by the presence of `error` vs `response`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
