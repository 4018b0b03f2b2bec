//! Cancellation Inference Engine
//!
//! Holds the trained logistic classifier together with the encoder state it
//! was fitted with, and serves single-record predictions for the live form.

mod bundle;
mod classifier;
mod engine;

pub use bundle::{
    aggregate_by_base, BaseImportance, BundleKind, ConfusionCounts, EvaluationMetrics, FeatureImportance,
    ModelBundle, TrainingSummary,
};
pub use classifier::{sigmoid, LogisticModel};
pub use engine::{predict, FormInput, InferenceConfig, InferenceEngine, PredictionResult};

use feature_engine::EncoderError;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error(transparent)]
    Encoding(#[from] EncoderError),
    #[error("Wrong model bundle: expected {expected:?}, got {actual:?}")]
    BundleKindMismatch {
        expected: BundleKind,
        actual: BundleKind,
    },
    #[error("Invalid model bundle: {0}")]
    InvalidBundle(String),
    #[error("Invalid input shape: expected {expected} features, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Decision score is not finite")]
    NonFiniteScore,
    #[error("Decision threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),
}

impl InferenceError {
    /// Plain-language text for the person filling in the form
    pub fn user_message(&self) -> String {
        match self {
            InferenceError::Encoding(EncoderError::SchemaMismatch { attribute }) => format!(
                "Please fill in every field before predicting (missing: {}).",
                display_field(attribute)
            ),
            InferenceError::Encoding(EncoderError::Encoding { attribute, .. }) => format!(
                "The value entered for {} is not valid.",
                display_field(attribute)
            ),
            InferenceError::NonFiniteScore => {
                "The values entered are too large to score.".to_string()
            }
            _ => "The prediction service is unavailable right now.".to_string(),
        }
    }
}

fn display_field(attribute: &str) -> &str {
    match attribute {
        "required_car_parking_spaces" => "parking spaces",
        "adr" => "average daily rate",
        "previous_cancellations" => "previous cancellations",
        "deposit_type" => "deposit type",
        other => other,
    }
}
