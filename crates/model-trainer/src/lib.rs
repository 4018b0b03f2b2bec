//! Cancellation Model Trainer
//!
//! Fits the reporting and form classifiers offline: stratified split,
//! encoder fitting on the training partition, L2-regularized logistic
//! regression and held-out evaluation.

mod config;
mod importance;
mod metrics;
mod optimizer;
mod split;
mod trainer;

pub use config::{DataConfig, LoggingConfig, TrainJobConfig, TrainerConfig};
pub use importance::feature_importances;
pub use metrics::evaluate;
pub use optimizer::{fit_logistic, FitResult, OptimizerSettings};
pub use split::{stratified_split, SplitIndices};
pub use trainer::{train, ConvergenceWarning, Trainer, TrainingOutcome};

use booking_data::DataError;
use feature_engine::EncoderError;
use inference_engine::InferenceError;
use thiserror::Error;

/// Errors during training
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("Not enough examples of class {class}: found {count}, need at least 2")]
    InsufficientData { class: u8, count: usize },
    #[error("Encoding failed: {0}")]
    Encoding(#[from] EncoderError),
    #[error("Dataset error: {0}")]
    Data(#[from] DataError),
    #[error("Trained model is inconsistent: {0}")]
    Inference(#[from] InferenceError),
    #[error("Invalid trainer configuration: {0}")]
    InvalidConfig(String),
    #[error("No attributes selected for training")]
    NoAttributes,
    #[error("Matrix error: {0}")]
    Matrix(String),
}
