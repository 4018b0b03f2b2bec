//! Hotel Cancellation Dashboard - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, AppConfig, AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    init_logging(&config.logging.level, &config.logging.format)?;

    info!("=== Hotel Cancellation Dashboard v{} ===", env!("CARGO_PKG_VERSION"));

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let state = AppState::initialize(&config)?.with_metrics(handle);
    run_server(&config.server.bind_address, Arc::new(state)).await?;

    Ok(())
}
