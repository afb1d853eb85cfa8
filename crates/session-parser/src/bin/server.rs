//! Schedule parser server binary
//!
//! Run with: cargo run -p session-parser --bin session-parser-server [config.toml]

use session_parser::{config::ParserConfig, server::ParserServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "session_parser=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Optional TOML config path as the first argument, env overrides on top
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => ParserConfig::load(&path)?,
        None => ParserConfig::default(),
    }
    .with_env_overrides();

    tracing::info!("Configuration loaded");
    tracing::info!("  - Port: {}", config.server.port);
    tracing::info!("  - Storage root: {}", config.storage.root.display());
    tracing::info!("  - Max parallel tasks: {}", config.processing.max_parallel_tasks);
    tracing::info!("  - Max upload: {} MB", config.server.max_upload_mb);

    let server = ParserServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/tasks             - Upload a schedule workbook");
    println!("  GET  /api/tasks/:id/status  - Task status");
    println!("  GET  /api/tasks/:id/result  - Parsed document");
    println!("  GET  /api/tasks/:id/memory  - Schedule summary");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
