//! Stowage - Save-Data Service
//!
//! Accepts `POST /save-data` and persists the payload to a file, the shared
//! database connection, or process memory.

use clap::Parser;

use stowage::config::Cli;
use stowage::server::{shutdown_signal, AppServer};
use stowage::APP_VERSION;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .init();

    tracing::info!("Stowage v{}", APP_VERSION);

    let config = cli.server_config()?;
    tracing::info!(file_path = %config.file_path.display(), database = ?config.database, "Loaded configuration");

    // Connect before binding; a failed connection aborts startup
    let server = AppServer::new(config).await?;

    let listener = server.bind().await?;
    tracing::info!("Press Ctrl+C to shutdown");

    server.serve(listener, shutdown_signal()).await?;

    Ok(())
}
