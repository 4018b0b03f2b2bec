//! Model Routes

use axum::{
    extract::{Query, State},
    Json,
};
use inference_engine::{BaseImportance, ConfusionCounts, TrainingSummary};
use reporting::{aggregate_importances, metrics_table, MetricRow, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ImportanceQuery {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[derive(Debug, Serialize)]
pub struct ImportanceResponse {
    pub data: Vec<BaseImportance>,
    pub top_n: usize,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub metrics: Vec<MetricRow>,
    pub confusion: ConfusionCounts,
    pub training: TrainingSummary,
}

/// Top base features of the reporting model
pub async fn importances(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ImportanceQuery>,
) -> Json<ImportanceResponse> {
    Json(ImportanceResponse {
        data: aggregate_importances(&state.reporting.importances, query.top_n),
        top_n: query.top_n,
    })
}

/// Held-out metrics of the reporting model
pub async fn evaluation(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    let bundle = &state.reporting;
    Json(MetricsResponse {
        metrics: metrics_table(&bundle.metrics),
        confusion: bundle.metrics.confusion,
        training: bundle.training,
    })
}
