//! taskflow - HTTP Server Entry Point
//!
//! Starts the HTTP server that serves the TaskFlow pages.

use taskflow::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskflow=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    if config.dev_mode {
        info!("Loaded configuration: dev mode (in-memory store, fixed identity)");
    } else {
        info!(
            "Loaded configuration: supabase={}",
            config.supabase_url.as_deref().unwrap_or("(unset)")
        );
    }

    // Start HTTP server
    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting server on {}", addr);

    api::serve(config).await?;

    Ok(())
}
