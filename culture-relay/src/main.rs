//! culture-relay - upload relay for the cultural heritage client
//!
//! Serves `/upload`, `/comment`, `/get_colors` and `/health`.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use culture_common::config::{ConfigOverrides, RelayConfig};
use culture_common::db::init_database;
use culture_relay::services::{ColorClient, SegmentationClient, StorageLayout, UploadOrchestrator};
use culture_relay::{build_router, AppState};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "culture-relay", version, about = "Image segmentation and feedback relay")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "CULTURE_CONFIG")]
    config: Option<PathBuf>,

    /// Socket address to listen on
    #[arg(short, long, env = "CULTURE_BIND")]
    bind: Option<String>,

    /// Root folder for uploaded and segmented images
    #[arg(long, env = "CULTURE_UPLOAD_ROOT")]
    upload_root: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, env = "CULTURE_DATABASE")]
    database: Option<PathBuf>,

    #[arg(long, env = "CULTURE_SEGMENTATION_ENDPOINT")]
    segmentation_endpoint: Option<String>,

    #[arg(long, env = "CULTURE_COLOR_ENDPOINT")]
    color_endpoint: Option<String>,

    /// Segmentation call timeout; 0 disables it
    #[arg(long, env = "CULTURE_SEGMENTATION_TIMEOUT_SECS")]
    segmentation_timeout_secs: Option<u64>,

    #[arg(long, env = "CULTURE_MAX_UPLOAD_BYTES")]
    max_upload_bytes: Option<usize>,

    /// Log level when RUST_LOG is unset
    #[arg(long, env = "CULTURE_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_address: self.bind.clone(),
            upload_root: self.upload_root.clone(),
            database_path: self.database.clone(),
            segmentation_endpoint: self.segmentation_endpoint.clone(),
            color_endpoint: self.color_endpoint.clone(),
            segmentation_timeout_secs: self.segmentation_timeout_secs,
            max_upload_bytes: self.max_upload_bytes,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is resolved before tracing exists; load errors go to stderr via anyhow
    let config = RelayConfig::load(args.config.as_deref(), args.overrides())
        .await
        .context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting culture-relay v{}", env!("CARGO_PKG_VERSION"));
    info!("Upload root: {}", config.upload_root.display());
    info!("Database path: {}", config.database_path.display());
    let pool = init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;

    let segmenter = SegmentationClient::new(
        config.segmentation_endpoint.clone(),
        config.segmentation_timeout,
    )
    .context("Failed to build segmentation client")?;
    let colors = ColorClient::new(config.color_endpoint.clone())
        .context("Failed to build color client")?;
    info!("Segmentation service: {}", segmenter.endpoint());
    info!("Color service: {}", colors.endpoint());

    let uploads = UploadOrchestrator::new(
        StorageLayout::new(config.upload_root.clone()),
        Arc::new(segmenter),
        pool.clone(),
    );
    let state = AppState::new(pool, uploads, colors).with_max_upload_bytes(config.max_upload_bytes);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("culture-relay listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
