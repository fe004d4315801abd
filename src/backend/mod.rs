//! Outbound model callers.
//!
//! Each supported model maps to one caller. A caller turns a prompt into
//! a single call against the hosted chat-completions API and reports the
//! generated text together with a token estimate and wall-clock latency.

pub mod buffered;
pub mod router;
pub mod streaming;
pub mod types;

use std::time::Duration;

use reqwest::Client;

use crate::error::GatewayError;

/// Outcome of one completed backend call.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub token_count: u32,
    pub latency_ms: f64,
}

/// Capability interface shared by the streamed and non-streamed callers.
#[async_trait::async_trait]
pub trait ModelCaller: Send + Sync {
    async fn call(&self, prompt: &str) -> Result<Generation, GatewayError>;
}

/// Build the shared HTTP client for outbound calls.
///
/// The timeout bounds a single backend round trip; generation can take
/// several seconds, so it is generous.
pub fn build_client() -> anyhow::Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(120))
        .build()?)
}

/// Whitespace-word-count approximation of combined prompt+response
/// length. Not a real tokenizer count; the log and the response payload
/// both depend on exactly this semantic.
pub(crate) fn approx_token_count(prompt: &str, response: &str) -> u32 {
    (prompt.split_whitespace().count() + response.split_whitespace().count()) as u32
}

/// Elapsed wall-clock time in milliseconds, rounded to two decimals.
pub(crate) fn elapsed_ms(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_count_is_word_count_of_both_sides() {
        assert_eq!(approx_token_count("a b c", "x y"), 5);
    }

    #[test]
    fn token_count_ignores_extra_whitespace() {
        assert_eq!(approx_token_count("  a\t b \n c ", ""), 3);
        assert_eq!(approx_token_count("", ""), 0);
    }

    #[test]
    fn elapsed_ms_rounds_to_two_decimals() {
        let ms = elapsed_ms(Duration::from_micros(1_234_567));
        assert_eq!(ms, 1234.57);
        assert!(ms >= 0.0);
    }

    #[test]
    fn build_client_succeeds() {
        assert!(build_client().is_ok());
    }
}
