//! API Errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use booking_data::DataError;
use inference_engine::InferenceError;
use serde_json::json;
use storage::StorageError;
use thiserror::Error;

/// Failures while starting the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to load dataset: {0}")]
    Data(#[from] DataError),
    #[error("Failed to load model bundle: {0}")]
    Storage(#[from] StorageError),
    #[error("Model bundle rejected: {0}")]
    Inference(#[from] InferenceError),
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed query parameters
    #[error("{0}")]
    BadRequest(String),
    /// Input that cannot be turned into a prediction; the text is shown to the user
    #[error("{0}")]
    Unprocessable(String),
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
