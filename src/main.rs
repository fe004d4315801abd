use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use prompt_gateway::backend;
use prompt_gateway::backend::router::ModelRouter;
use prompt_gateway::config::{Args, Config};
use prompt_gateway::gateway::router::{AppState, create_gateway_router};
use prompt_gateway::logstore::PromptLog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_args(Args::parse())?;

    let log = PromptLog::open(&config.log_path)
        .with_context(|| format!("failed to open prompt log at {}", config.log_path.display()))?;
    tracing::info!(path = %log.path().display(), "prompt log ready");

    let client = backend::build_client()?;
    let models = ModelRouter::new(client, &config.api_key, &config.backend_url);

    let state = AppState {
        models: Arc::new(models),
        log: Arc::new(log),
    };
    let app = create_gateway_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {e}");
        return;
    }
    tracing::info!("shutting down");
}
