use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use voxora_handler::synthesizer::load_aws_config;
use voxora_handler::{create_router, HandlerConfig, HandlerState, PollySynthesizer, S3AudioStore};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = HandlerConfig::from_env()?;
    let aws_config = load_aws_config(config.profile.as_deref(), &config.region).await;

    let state = HandlerState::new(
        Arc::new(PollySynthesizer::new(&aws_config)),
        Arc::new(S3AudioStore::new(&aws_config, &config.bucket_name)),
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    tracing::info!(addr = %config.addr, bucket = %config.bucket_name, "voxora handler listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down");
}
