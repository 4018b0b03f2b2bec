//! Offline Training Job
//!
//! Usage: `train-models [CONFIG_PATH]`

use anyhow::{anyhow, Context, Result};
use booking_data::Dataset;
use model_trainer::{LoggingConfig, TrainJobConfig, Trainer, TrainingOutcome};
use std::path::PathBuf;
use storage::BundleStore;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = TrainJobConfig::load(config_path.as_deref())
        .context("Failed to load configuration")?;
    init_logging(&config.logging)?;

    info!("=== Cancellation Model Training v{} ===", env!("CARGO_PKG_VERSION"));

    let dataset = Dataset::load(&config.data.path)
        .with_context(|| format!("Failed to read dataset {}", config.data.path.display()))?;
    if dataset.skipped_rows() > 0 {
        warn!("{} rows were skipped while loading", dataset.skipped_rows());
    }

    let trainer = Trainer::new(config.training.clone()).context("Invalid training settings")?;
    let store = BundleStore::from_config(&config.models);

    let reporting = trainer
        .train_reporting(&dataset)
        .context("Failed to train the reporting model")?;
    let form = trainer
        .train_form(&dataset)
        .context("Failed to train the form model")?;

    for outcome in [&reporting, &form] {
        summarize(outcome);
        store
            .save(&outcome.bundle)
            .with_context(|| format!("Failed to save the {} bundle", outcome.bundle.kind.as_str()))?;
    }

    info!("Training complete");
    Ok(())
}

fn summarize(outcome: &TrainingOutcome) {
    let bundle = &outcome.bundle;
    info!(
        "{} model: accuracy={:.4} precision={:.4} recall={:.4} f1={:.4}",
        bundle.kind.as_str(),
        bundle.metrics.accuracy,
        bundle.metrics.precision,
        bundle.metrics.recall,
        bundle.metrics.f1
    );
    for item in bundle.base_importances.iter().take(10) {
        info!("  {:<32} {:.4}", item.base, item.importance);
    }
}

fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level: Level = config
        .level
        .parse()
        .map_err(|_| anyhow!("Unknown log level {:?}", config.level))?;
    let builder = FmtSubscriber::builder().with_max_level(level).with_target(true);

    let installed = if config.format == "json" {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.context("Failed to set tracing subscriber")
}
