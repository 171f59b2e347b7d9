//! loantrack-web - Library book loan tracker
//!
//! Single-process web service backed by SQLite. Records loan/return actions
//! against an append-only log and registers books by querying the OpenBD
//! bibliographic metadata API.

use anyhow::Result;
use clap::Parser;
use loantrack_common::config::{Config, Overrides};
use std::path::PathBuf;
use tracing::info;

use loantrack_web::metadata::OpenBdClient;
use loantrack_web::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "loantrack-web", version, about = "Library book loan tracker")]
struct Cli {
    /// SQLite database file path
    #[arg(long, env = "LOANTRACK_DATABASE")]
    database: Option<PathBuf>,

    /// Listen address (host:port)
    #[arg(long, env = "LOANTRACK_BIND")]
    bind: Option<String>,

    /// Base URL of the OpenBD metadata service
    #[arg(long, env = "LOANTRACK_OPENBD_URL")]
    openbd_url: Option<String>,

    /// TOML config file path
    #[arg(long, env = "LOANTRACK_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting loantrack-web v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = Config::resolve(Overrides {
        database: cli.database,
        bind: cli.bind,
        openbd_url: cli.openbd_url,
        config_file: cli.config,
    })?;

    info!("Database path: {}", config.database.display());
    let pool = loantrack_common::db::init_database(&config.database).await?;
    info!("Database connection established");

    let metadata = OpenBdClient::new(&config.openbd_url, config.metadata_timeout());

    let state = AppState::new(pool, metadata);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("loantrack-web listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
