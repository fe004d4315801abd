//! `POST /generate` handler.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;

use super::router::AppState;
use super::types::{ErrorResponse, GenerateParams, GenerateResponse, PromptRequest};
use crate::logstore::LogRecord;

/// POST /generate?model={llama2|mistral}
///
/// Dispatches the prompt to the selected backend, logs the completed
/// pair, and returns either `{model, prompt, response, token_count,
/// latency_ms}` or `{error}`. Failures never escape as transport-level
/// errors; both outcomes are structured 200 bodies.
pub async fn generate(
    State(state): State<AppState>,
    Query(params): Query<GenerateParams>,
    Json(request): Json<PromptRequest>,
) -> Response {
    tracing::info!(model = %params.model, "prompt received");

    let generation = match state.models.dispatch(params.model, &request.prompt).await {
        Ok(generation) => generation,
        Err(e) => {
            tracing::warn!(model = %params.model, "generation failed: {e}");
            return Json(ErrorResponse::new(e.to_string())).into_response();
        }
    };

    let record = LogRecord {
        timestamp: Utc::now().to_rfc3339(),
        model: params.model.to_string(),
        prompt: request.prompt.clone(),
        response: generation.text.clone(),
        token_count: generation.token_count,
        latency_ms: generation.latency_ms,
    };

    // A lost log row must not discard an already-computed answer.
    match state.log.append(&record).await {
        Ok(()) => tracing::debug!(path = %state.log.path().display(), "logged generation"),
        Err(e) => tracing::error!("{e}"),
    }

    Json(GenerateResponse {
        model: params.model.to_string(),
        prompt: request.prompt,
        response: generation.text,
        token_count: generation.token_count,
        latency_ms: generation.latency_ms,
    })
    .into_response()
}
