//! Model Reports

use inference_engine::{aggregate_by_base, BaseImportance, EvaluationMetrics, FeatureImportance};
use serde::Serialize;

/// Bars shown in the importance chart by default
pub const DEFAULT_TOP_N: usize = 10;

/// One row of the metrics table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRow {
    pub metric: String,
    /// Formatted with two decimals
    pub value: String,
}

/// Importances summed per base feature, top `top_n` only
pub fn aggregate_importances(importances: &[FeatureImportance], top_n: usize) -> Vec<BaseImportance> {
    let mut aggregated = aggregate_by_base(importances);
    aggregated.truncate(top_n);
    aggregated
}

pub fn metrics_table(metrics: &EvaluationMetrics) -> Vec<MetricRow> {
    [
        ("accuracy", metrics.accuracy),
        ("precision", metrics.precision),
        ("recall", metrics.recall),
        ("f1", metrics.f1),
    ]
    .into_iter()
    .map(|(metric, value)| MetricRow {
        metric: metric.to_string(),
        value: format!("{:.2}", value),
    })
    .collect()
}
