//! Non-streamed caller: one request, one JSON completion back.

use std::time::Instant;

use reqwest::Client;

use super::types::{ChatMessage, ChatRequest, ChatResponse};
use super::{Generation, ModelCaller, approx_token_count, elapsed_ms};
use crate::error::GatewayError;

pub struct BufferedCaller {
    client: Client,
    url: String,
    api_key: String,
    model: &'static str,
    temperature: f64,
    max_tokens: u32,
}

impl BufferedCaller {
    pub fn new(client: Client, api_key: String, base_url: &str, model: &'static str) -> Self {
        Self {
            client,
            url: format!("{base_url}/chat/completions"),
            api_key,
            model,
            temperature: 0.7,
            max_tokens: 200,
        }
    }

    fn failure(&self) -> GatewayError {
        GatewayError::BackendCallFailed(format!("{} failed to generate output", self.model))
    }
}

#[async_trait::async_trait]
impl ModelCaller for BufferedCaller {
    async fn call(&self, prompt: &str) -> Result<Generation, GatewayError> {
        let payload = ChatRequest {
            model: self.model,
            messages: vec![ChatMessage::user(prompt)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: None,
            stop: Some(None),
            stream: false,
        };

        let start = Instant::now();
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model = self.model, "backend request failed: {e}");
                self.failure()
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(model = self.model, %status, "backend returned error: {body}");
            return Err(self.failure());
        }

        let completion: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!(model = self.model, "malformed backend response: {e}");
            self.failure()
        })?;

        let text = completion
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| {
                tracing::error!(model = self.model, "backend response had no choices");
                self.failure()
            })?;

        let latency_ms = elapsed_ms(start.elapsed());
        let token_count = approx_token_count(prompt, &text);

        Ok(Generation {
            text,
            token_count,
            latency_ms,
        })
    }
}
