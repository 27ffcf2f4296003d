//! Nexora HTTP Server
//!
//! Serves recommendations, the accept/dismiss workflow and chat over REST.

use anyhow::Result;
use nexora_server::{
    api,
    config::{LogFormat, ServerConfig},
    engine,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;

    // Initialize tracing
    init_tracing(config.log_format)?;
    info!("Loaded configuration: {:?}", config);

    // Initialize recommendation engine
    let engine = engine::init_engine(&config).await?;
    info!("Recommendation engine initialized");

    let app = api::create_router(Arc::new(engine));

    // Start server
    let addr = config.bind_address();
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    info!("✓ Server listening on http://{}", addr);
    info!("  Health check: http://{}/health", addr);
    info!("  Sessions: POST http://{}/v1/sessions", addr);
    info!("  Recommendations: POST http://{}/v1/recommendations", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "nexora_server=info,nexora_sdk=info,nexora_retrieval=info,tower_http=debug".into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}
