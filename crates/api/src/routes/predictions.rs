//! Prediction Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use feature_engine::EncoderError;
use inference_engine::{FormInput, InferenceError};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::AppState;

/// Text shown before the form is submitted
pub const PROMPT_MESSAGE: &str = "Fill in the details and click Predict to see the result.";

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub message: String,
    pub canceled: bool,
    pub cancel_probability: f64,
    pub threshold: f64,
}

/// Initial form prompt
pub async fn prompt() -> Json<PromptResponse> {
    Json(PromptResponse {
        message: PROMPT_MESSAGE,
    })
}

/// Predict from the four form fields
pub async fn create_prediction(
    State(state): State<Arc<AppState>>,
    form: Result<Json<FormInput>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    metrics::counter!("predictions_total").increment(1);

    let Json(form) = form.map_err(|rejection| {
        metrics::counter!("prediction_errors_total").increment(1);
        warn!("Unreadable form body: {}", rejection.body_text());
        ApiError::Unprocessable(rejection_message(&rejection))
    })?;

    match state.engine.predict_form(&form) {
        Ok(result) => {
            debug!("Form prediction p={:.4}", result.cancel_probability);
            Ok(Json(PredictionResponse {
                message: result.message(),
                canceled: result.canceled,
                cancel_probability: result.cancel_probability,
                threshold: result.threshold,
            }))
        }
        Err(e) => {
            metrics::counter!("prediction_errors_total").increment(1);
            warn!("Rejected form input: {}", e);
            Err(ApiError::Unprocessable(e.user_message()))
        }
    }
}

/// Plain-language text for a body that does not deserialize into the form
fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        // serde reports the offending field as "<field>: <reason>"
        JsonRejection::JsonDataError(_) => {
            let text = rejection.body_text();
            let detail = text.split_once("target type: ").map_or(text.as_str(), |(_, d)| d);
            match detail.split_once(": ") {
                Some((field, reason)) if !field.contains(' ') => InferenceError::from(
                    EncoderError::Encoding {
                        attribute: field.to_string(),
                        reason: reason.to_string(),
                    },
                )
                .user_message(),
                _ => FORM_UNREADABLE.to_string(),
            }
        }
        _ => FORM_UNREADABLE.to_string(),
    }
}

const FORM_UNREADABLE: &str = "The form could not be read. Please check the values entered.";
