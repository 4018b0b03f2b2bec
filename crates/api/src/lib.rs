//! Hotel Cancellation Dashboard API
//!
//! Serves the data behind every dashboard chart and the live prediction form.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
mod routes;
mod state;

pub use config::AppConfig;
pub use error::{ApiError, ServerError};
pub use routes::predictions::PROMPT_MESSAGE;
pub use state::AppState;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub bookings: usize,
    pub components: ComponentStatus,
}

/// Loaded model bundles
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub reporting_model: ModelStatus,
    pub form_model: ModelStatus,
}

#[derive(Debug, Serialize)]
pub struct ModelStatus {
    pub features: usize,
    pub converged: bool,
    pub accuracy: f64,
}

#[derive(Debug, Serialize)]
pub struct MonthsResponse {
    /// `YYYY-MM`, ascending
    pub months: Vec<String>,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/months", get(months_handler))
        .route("/api/v1/reports/monthly", get(routes::reports::monthly))
        .route("/api/v1/reports/yearly", get(routes::reports::yearly))
        .route("/api/v1/reports/lead-time", get(routes::reports::lead_time))
        .route("/api/v1/reports/lead-time-rate", get(routes::reports::lead_time_rate))
        .route("/api/v1/reports/lead-time-heatmap", get(routes::reports::lead_time_heatmap))
        .route("/api/v1/reports/deposit-distribution", get(routes::reports::deposit_distribution))
        .route("/api/v1/reports/deposit-breakdown", get(routes::reports::deposit_breakdown))
        .route("/api/v1/reports/reservation-flow", get(routes::reports::flow))
        .route("/api/v1/model/importances", get(routes::model::importances))
        .route("/api/v1/model/metrics", get(routes::model::evaluation))
        .route(
            "/api/v1/predictions",
            get(routes::predictions::prompt).post(routes::predictions::create_prediction),
        )
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let status = |bundle: &inference_engine::ModelBundle| ModelStatus {
        features: bundle.schema().len(),
        converged: bundle.training.converged,
        accuracy: bundle.metrics.accuracy,
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        bookings: state.dataset.len(),
        components: ComponentStatus {
            reporting_model: status(&state.reporting),
            form_model: status(state.engine.bundle()),
        },
    })
}

/// Months available to the date range control
async fn months_handler(State(state): State<Arc<AppState>>) -> Json<MonthsResponse> {
    Json(MonthsResponse {
        months: state
            .dataset
            .available_months()
            .iter()
            .map(|m| m.format("%Y-%m").to_string())
            .collect(),
    })
}

/// Prometheus text exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(level: &str, format: &str) -> Result<(), ServerError> {
    let level: Level = level
        .parse()
        .map_err(|_| ServerError::Logging(format!("unknown log level {:?}", level)))?;
    let builder = FmtSubscriber::builder().with_max_level(level).with_target(true);

    let installed = if format == "json" {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.map_err(|e| ServerError::Logging(e.to_string()))
}

/// Run the server
pub async fn run_server(addr: &str, state: Arc<AppState>) -> Result<(), ServerError> {
    let app = create_router(state);

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use booking_data::Dataset;
    use inference_engine::InferenceConfig;
    use model_trainer::Trainer;
    use reporting::ReportStyle;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// 60 bookings over two hotels and six months
    fn dataset_csv() -> String {
        let mut csv = String::from(
            "hotel,is_canceled,lead_time,arrival_date,adr,deposit_type,required_car_parking_spaces,previous_cancellations,country,reservation_status\n",
        );
        for i in 0..60 {
            let hotel = if i % 2 == 0 { "City Hotel" } else { "Resort Hotel" };
            let canceled = i % 3 == 0;
            let deposit = if canceled && i % 2 == 0 { "Non Refund" } else { "No Deposit" };
            let month = 1 + i % 6;
            let parking = if !canceled && i % 4 == 1 { 1 } else { 0 };
            let country = if i % 5 == 0 { "PRT" } else { "GBR" };
            let status = if canceled { "Canceled" } else { "Check-Out" };
            csv.push_str(&format!(
                "{},{},{},2016-{:02}-{:02},{:.1},{},{},{},{},{}\n",
                hotel,
                u8::from(canceled),
                (i * 7) % 120,
                month,
                1 + i % 28,
                60.0 + i as f64,
                deposit,
                parking,
                u8::from(canceled && i % 9 == 0),
                country,
                status,
            ));
        }
        csv
    }

    fn state() -> Arc<AppState> {
        let dataset = Dataset::from_reader(dataset_csv().as_bytes()).unwrap();
        let trainer = Trainer::default();
        let reporting = trainer.train_reporting(&dataset).unwrap().bundle;
        let form = trainer.train_form(&dataset).unwrap().bundle;
        Arc::new(
            AppState::new(
                dataset,
                reporting,
                form,
                InferenceConfig::default(),
                ReportStyle::default(),
            )
            .unwrap(),
        )
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(create_router(state()), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["bookings"], 60);
        assert!(body["components"]["form_model"]["features"].as_u64().unwrap() >= 4);
    }

    #[tokio::test]
    async fn test_months() {
        let (_, body) = get_json(create_router(state()), "/api/v1/months").await;
        assert_eq!(
            body["months"],
            json!(["2016-01", "2016-02", "2016-03", "2016-04", "2016-05", "2016-06"])
        );
    }

    #[tokio::test]
    async fn test_monthly_report_filters() {
        let app = create_router(state());
        let (status, body) = get_json(
            app,
            "/api/v1/reports/monthly?start=2016-02&end=2016-03&hotel=City%20Hotel",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let rows = body["data"].as_array().unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r["hotel"] == "City Hotel"));
        assert!(rows
            .iter()
            .all(|r| r["month"] == "2016-02-01" || r["month"] == "2016-03-01"));
        assert_eq!(body["colors"]["City Hotel"], "#636EFA");
    }

    #[tokio::test]
    async fn test_open_ended_range() {
        let (status, body) = get_json(create_router(state()), "/api/v1/reports/yearly?start=2016-05").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bookings"], 20);
    }

    #[tokio::test]
    async fn test_bad_filters_rejected() {
        let (status, body) = get_json(create_router(state()), "/api/v1/reports/monthly?hotel=Motel").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Motel"));

        let (status, _) = get_json(create_router(state()), "/api/v1/reports/monthly?start=2016-13").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(create_router(state()), "/api/v1/reports/lead-time?bins=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_lead_time_with_cancellations() {
        let (status, body) = get_json(
            create_router(state()),
            "/api/v1/reports/lead-time?bins=10&show_cancellations=true",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["bins"].as_array().unwrap().len(), 10);
        assert!(body["data"]["cancellations"].is_array());
    }

    #[tokio::test]
    async fn test_every_report_route_answers() {
        for report in [
            "lead-time-rate",
            "lead-time-heatmap",
            "deposit-distribution",
            "deposit-breakdown",
            "reservation-flow",
        ] {
            let uri = format!("/api/v1/reports/{}", report);
            let (status, body) = get_json(create_router(state()), &uri).await;
            assert_eq!(status, StatusCode::OK, "{}", report);
            assert_eq!(body["bookings"], 60, "{}", report);
        }
    }

    #[tokio::test]
    async fn test_importances_and_metrics() {
        let app = create_router(state());
        let (status, body) = get_json(app.clone(), "/api/v1/model/importances?top_n=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let (status, body) = get_json(app, "/api/v1/model/metrics").await;
        assert_eq!(status, StatusCode::OK);
        let rows = body["metrics"].as_array().unwrap();
        assert_eq!(rows[0]["metric"], "accuracy");
        assert_eq!(rows[0]["value"].as_str().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_prediction_message() {
        let app = create_router(state());
        let (status, body) = post_json(
            app,
            "/api/v1/predictions",
            json!({
                "required_car_parking_spaces": 1,
                "adr": 100,
                "previous_cancellations": 0,
                "deposit_type": "No Deposit"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("Prediction: "));
        assert!(message.ends_with("% chance)"));
        let p = body["cancel_probability"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[tokio::test]
    async fn test_missing_field_is_unprocessable() {
        let (status, body) = post_json(
            create_router(state()),
            "/api/v1/predictions",
            json!({ "adr": 80, "previous_cancellations": 0, "deposit_type": "No Deposit" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["error"],
            "Please fill in every field before predicting (missing: parking spaces)."
        );
    }

    #[tokio::test]
    async fn test_wrong_field_types_get_plain_messages() {
        let (status, body) = post_json(
            create_router(state()),
            "/api/v1/predictions",
            json!({
                "required_car_parking_spaces": 0,
                "adr": "abc",
                "previous_cancellations": 0,
                "deposit_type": "No Deposit"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "The value entered for average daily rate is not valid.");

        let (status, body) = post_json(
            create_router(state()),
            "/api/v1/predictions",
            json!({
                "required_car_parking_spaces": 0,
                "adr": 90,
                "previous_cancellations": 0,
                "deposit_type": 5
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "The value entered for deposit type is not valid.");
    }

    #[tokio::test]
    async fn test_malformed_body_is_unprocessable() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/predictions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"adr\": "))
            .unwrap();
        let response = create_router(state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["error"],
            "The form could not be read. Please check the values entered."
        );
    }

    #[tokio::test]
    async fn test_extreme_form_values_rejected() {
        let (status, body) = post_json(
            create_router(state()),
            "/api/v1/predictions",
            json!({
                "required_car_parking_spaces": 1e308,
                "adr": 100,
                "previous_cancellations": 1e308,
                "deposit_type": "No Deposit"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().starts_with("The value"));
    }

    #[tokio::test]
    async fn test_prompt() {
        let (status, body) = get_json(create_router(state()), "/api/v1/predictions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], PROMPT_MESSAGE);
    }

    #[tokio::test]
    async fn test_metrics_without_recorder() {
        let response = create_router(state())
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_initialize_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("bookings.csv");
        std::fs::write(&csv_path, dataset_csv()).unwrap();

        let dataset = Dataset::load(&csv_path).unwrap();
        let trainer = Trainer::default();
        let mut config = AppConfig::default();
        config.data.path = csv_path;
        config.models.reporting_path = dir.path().join("models/model.bin");
        config.models.form_path = dir.path().join("models/form_model.bin");

        let store = storage::BundleStore::from_config(&config.models);
        store
            .save(&trainer.train_reporting(&dataset).unwrap().bundle)
            .unwrap();
        store.save(&trainer.train_form(&dataset).unwrap().bundle).unwrap();

        let state = AppState::initialize(&config).unwrap();
        assert_eq!(state.dataset.len(), 60);
        assert!(state.metrics.is_none());
    }

    #[test]
    fn test_missing_bundle_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("bookings.csv");
        std::fs::write(&csv_path, dataset_csv()).unwrap();

        let mut config = AppConfig::default();
        config.data.path = csv_path;
        config.models.reporting_path = dir.path().join("absent.bin");

        assert!(matches!(
            AppState::initialize(&config),
            Err(ServerError::Storage(_))
        ));
    }

    #[test]
    fn test_form_bundle_required() {
        let dataset = Dataset::from_reader(dataset_csv().as_bytes()).unwrap();
        let reporting = Trainer::default().train_reporting(&dataset).unwrap().bundle;
        let result = AppState::new(
            dataset,
            reporting.clone(),
            reporting,
            InferenceConfig::default(),
            ReportStyle::default(),
        );
        assert!(matches!(result, Err(ServerError::Inference(_))));
    }
}
