//! BloomWatch API Server
//!
//! Searches Sentinel-2 L2A scenes over an area of interest and classifies
//! vegetation from their NDVI.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use bloomwatch_api::config::ApiConfig;
use bloomwatch_api::state::AppState;

/// BloomWatch API Server
#[derive(Parser, Debug)]
#[command(name = "bloomwatch-api")]
#[command(about = "Sentinel-2 scene search and NDVI vegetation state API")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "BLOOMWATCH_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "BLOOMWATCH_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Optional YAML config file
    #[arg(short, long, env = "BLOOMWATCH_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    info!("Starting BloomWatch API server");

    let config = ApiConfig::load(args.config.as_deref())?;
    let state = Arc::new(AppState::new(config)?.with_prometheus(prometheus_handle));

    let app = bloomwatch_api::app(state);

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("BloomWatch API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
