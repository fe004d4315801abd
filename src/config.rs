//! Process configuration.
//!
//! The only secret is the backend API key, read once from the
//! environment at startup. Everything else has CLI defaults.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

/// Default chat-completions endpoint base.
pub const DEFAULT_BACKEND_URL: &str = "https://api.groq.com/openai/v1";

/// Default location of the prompt log.
pub const DEFAULT_LOG_PATH: &str = "logs/prompts_log.csv";

#[derive(Debug, Parser)]
#[command(name = "prompt-gateway", about = "HTTP gateway in front of two hosted LLM backends")]
pub struct Args {
    /// Listen address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Prompt log file path
    #[arg(long, default_value = DEFAULT_LOG_PATH)]
    pub log_path: PathBuf,

    /// Chat-completions API base URL
    #[arg(long, default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_path: PathBuf,
    pub backend_url: String,
    pub api_key: String,
}

impl Config {
    /// Build the configuration from CLI args plus the environment.
    ///
    /// A missing `GROQ_API_KEY` is a fatal startup condition: the callers
    /// need the credential on every request, so failing fast here beats
    /// failing per-request later.
    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .context("missing GROQ_API_KEY in environment")?;
        if api_key.is_empty() {
            anyhow::bail!("GROQ_API_KEY is set but empty");
        }

        Ok(Self {
            host: args.host,
            port: args.port,
            log_path: args.log_path,
            backend_url: args.backend_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}
