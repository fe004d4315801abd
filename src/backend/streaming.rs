//! Streamed caller: the backend sends incremental text-delta events and
//! the caller concatenates them into the final text before returning.
//! Streaming is internal; partial output never reaches the gateway's
//! own caller.

use std::time::Instant;

use futures::StreamExt;
use reqwest::Client;

use super::types::{ChatChunk, ChatMessage, ChatRequest};
use super::{Generation, ModelCaller, approx_token_count, elapsed_ms};
use crate::error::GatewayError;

pub struct StreamingCaller {
    client: Client,
    url: String,
    api_key: String,
    model: &'static str,
    temperature: f64,
    max_tokens: u32,
}

impl StreamingCaller {
    pub fn new(client: Client, api_key: String, base_url: &str, model: &'static str) -> Self {
        Self {
            client,
            url: format!("{base_url}/chat/completions"),
            api_key,
            model,
            temperature: 1.0,
            max_tokens: 512,
        }
    }

    fn failure(&self) -> GatewayError {
        GatewayError::BackendCallFailed(format!("{} failed to generate output", self.model))
    }
}

#[async_trait::async_trait]
impl ModelCaller for StreamingCaller {
    async fn call(&self, prompt: &str) -> Result<Generation, GatewayError> {
        let payload = ChatRequest {
            model: self.model,
            messages: vec![ChatMessage::user(prompt)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: Some(1.0),
            stop: None,
            stream: true,
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

        let mut acc = SseAccumulator::default();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                tracing::error!(model = self.model, "backend stream aborted: {e}");
                self.failure()
            })?;
            acc.push(&chunk).map_err(|e| {
                tracing::error!(model = self.model, "malformed stream event: {e}");
                self.failure()
            })?;
        }

        let text = acc.finish().map_err(|e| {
            tracing::error!(model = self.model, "malformed stream event: {e}");
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

/// Incremental server-sent-event parser for `data:` lines carrying
/// chat-completion chunks. The network may split events at arbitrary
/// byte boundaries, including inside a multi-byte UTF-8 character, so
/// raw bytes are buffered and only complete lines are decoded.
#[derive(Default)]
struct SseAccumulator {
    buf: Vec<u8>,
    text: String,
}

impl SseAccumulator {
    fn push(&mut self, bytes: &[u8]) -> Result<(), serde_json::Error> {
        self.buf.extend_from_slice(bytes);
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            self.consume_line(line.trim())?;
        }
        Ok(())
    }

    /// Drain any trailing line and return the trimmed concatenated text.
    fn finish(mut self) -> Result<String, serde_json::Error> {
        let rest = std::mem::take(&mut self.buf);
        let rest = String::from_utf8_lossy(&rest);
        self.consume_line(rest.trim())?;
        Ok(self.text.trim().to_string())
    }

    fn consume_line(&mut self, line: &str) -> Result<(), serde_json::Error> {
        let Some(data) = line.strip_prefix("data:") else {
            return Ok(());
        };
        let data = data.trim();
        if data.is_empty() || data == "[DONE]" {
            return Ok(());
        }
        let chunk: ChatChunk = serde_json::from_str(data)?;
        if let Some(delta) = chunk.choices.first().and_then(|c| c.delta.content.as_deref()) {
            self.text.push_str(delta);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta_event(content: &str) -> String {
        format!(
            "data: {{\"choices\":[{{\"delta\":{{\"content\":\"{content}\"}}}}]}}\n\n"
        )
    }

    #[test]
    fn concatenates_fragments_in_order() {
        let mut acc = SseAccumulator::default();
        acc.push(delta_event("Hello").as_bytes()).unwrap();
        acc.push(delta_event(", world").as_bytes()).unwrap();
        acc.push(b"data: [DONE]\n\n").unwrap();
        assert_eq!(acc.finish().unwrap(), "Hello, world");
    }

    #[test]
    fn handles_events_split_across_reads() {
        let event = delta_event("abc");
        let (head, tail) = event.split_at(10);
        let mut acc = SseAccumulator::default();
        acc.push(head.as_bytes()).unwrap();
        acc.push(tail.as_bytes()).unwrap();
        assert_eq!(acc.finish().unwrap(), "abc");
    }

    #[test]
    fn reassembles_multibyte_chars_split_across_reads() {
        let event = delta_event("héllo wörld");
        let bytes = event.as_bytes();
        // Split inside the two-byte 'é'.
        let split = event.find('é').unwrap() + 1;
        let mut acc = SseAccumulator::default();
        acc.push(&bytes[..split]).unwrap();
        acc.push(&bytes[split..]).unwrap();
        assert_eq!(acc.finish().unwrap(), "héllo wörld");
    }

    #[test]
    fn skips_events_with_empty_delta() {
        let mut acc = SseAccumulator::default();
        acc.push(b"data: {\"choices\":[{\"delta\":{}}]}\n").unwrap();
        acc.push(delta_event("ok").as_bytes()).unwrap();
        assert_eq!(acc.finish().unwrap(), "ok");
    }

    #[test]
    fn final_text_is_whitespace_trimmed() {
        let mut acc = SseAccumulator::default();
        acc.push(delta_event("  padded  ").as_bytes()).unwrap();
        assert_eq!(acc.finish().unwrap(), "padded");
    }

    #[test]
    fn rejects_malformed_chunk_json() {
        let mut acc = SseAccumulator::default();
        assert!(acc.push(b"data: {not json}\n").is_err());
    }
}
