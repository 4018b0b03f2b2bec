//! Shared Application State

use crate::config::AppConfig;
use crate::error::ServerError;
use booking_data::Dataset;
use inference_engine::{BundleKind, InferenceConfig, InferenceEngine, ModelBundle};
use metrics_exporter_prometheus::PrometheusHandle;
use reporting::ReportStyle;
use std::time::Instant;
use storage::BundleStore;
use tracing::info;

/// Everything handlers read; built once at startup and never mutated
pub struct AppState {
    pub dataset: Dataset,
    /// Bundle behind the importance chart and metrics table
    pub reporting: ModelBundle,
    /// Live predictor backed by the form bundle
    pub engine: InferenceEngine,
    pub style: ReportStyle,
    /// Present when a Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
    pub version: String,
    pub start_time: Instant,
}

impl AppState {
    /// Load the dataset and both bundles named in the configuration
    pub fn initialize(config: &AppConfig) -> Result<Self, ServerError> {
        let dataset = Dataset::load(&config.data.path)?;
        let store = BundleStore::from_config(&config.models);
        let reporting = store.load(BundleKind::Reporting)?;
        let form = store.load(BundleKind::Form)?;

        Self::new(
            dataset,
            reporting,
            form,
            config.inference.clone(),
            config.style.clone(),
        )
    }

    /// Assemble state from already-loaded parts
    pub fn new(
        dataset: Dataset,
        reporting: ModelBundle,
        form: ModelBundle,
        inference: InferenceConfig,
        style: ReportStyle,
    ) -> Result<Self, ServerError> {
        reporting.expect_kind(BundleKind::Reporting)?;
        let engine = InferenceEngine::new(form, inference)?;

        info!(
            "Application state ready: {} bookings, {} reporting features",
            dataset.len(),
            reporting.schema().len()
        );

        Ok(Self {
            dataset,
            reporting,
            engine,
            style,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        })
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
