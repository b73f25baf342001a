use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use blog_api::config::AppConfig;
use blog_api::{app, AppState, Backend};

#[derive(Debug, Parser)]
#[command(name = "blog-api", version, about = "Blog content API server")]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory for uploaded images (overrides UPLOADS_DIR)
    #[arg(long)]
    uploads_dir: Option<PathBuf>,

    /// Keep users and posts in memory instead of PostgreSQL
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config: AppConfig = blog_api::config::config().clone();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(dir) = cli.uploads_dir {
        config.uploads.dir = dir;
    }
    config.validate().map_err(anyhow::Error::msg)?;
    tracing::info!("Starting Blog API in {:?} mode", config.environment);

    let backend = if cli.memory { Backend::Memory } else { Backend::Postgres };
    let state = AppState::from_config(&config, backend).await?;
    let database = state.database.clone();

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Blog API listening on http://{}", bind_addr);

    axum::serve(listener, app(state, &config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(database) = database {
        database.close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
