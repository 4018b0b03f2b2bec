//! Inference Engine Implementation

use crate::bundle::{BundleKind, ModelBundle};
use crate::InferenceError;
use booking_data::{columns, RawRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Inference configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Positive-class probability at or above which a cancellation is predicted
    pub threshold: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl InferenceConfig {
    pub fn validate(&self) -> Result<(), InferenceError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(InferenceError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

/// Outcome of one prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted class: true when a cancellation is likely
    pub canceled: bool,
    /// Probability of cancellation in [0, 1]
    pub cancel_probability: f64,
    /// Threshold the class was decided with
    pub threshold: f64,
}

impl PredictionResult {
    /// Probability of whichever class was predicted
    pub fn winning_probability(&self) -> f64 {
        if self.canceled {
            self.cancel_probability
        } else {
            1.0 - self.cancel_probability
        }
    }

    /// Text shown under the prediction form
    pub fn message(&self) -> String {
        let pct = self.winning_probability() * 100.0;
        if self.canceled {
            format!("Prediction: Cancellation Likely ({:.2}% chance)", pct)
        } else {
            format!("Prediction: No Cancellation ({:.2}% chance)", pct)
        }
    }
}

/// Values submitted through the prediction form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    pub required_car_parking_spaces: Option<f64>,
    pub adr: Option<f64>,
    pub previous_cancellations: Option<f64>,
    /// Plain category, e.g. "No Deposit"
    pub deposit_type: Option<String>,
}

impl FormInput {
    /// Raw record with every form field; blank fields become missing values
    pub fn to_record(&self) -> RawRecord {
        let deposit = self
            .deposit_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        RawRecord::new()
            .with(columns::PARKING_SPACES, self.required_car_parking_spaces)
            .with(columns::ADR, self.adr)
            .with(columns::PREVIOUS_CANCELLATIONS, self.previous_cancellations)
            .with(columns::DEPOSIT_TYPE, deposit)
    }
}

/// Predict with a bundle at the default threshold
pub fn predict(record: &RawRecord, bundle: &ModelBundle) -> Result<PredictionResult, InferenceError> {
    classify(record, bundle, InferenceConfig::default().threshold)
}

fn classify(
    record: &RawRecord,
    bundle: &ModelBundle,
    threshold: f64,
) -> Result<PredictionResult, InferenceError> {
    // Reindex against the persisted schema, never the record's own columns
    let features = bundle.encoder.encode_with(record, bundle.schema())?;
    let cancel_probability = bundle.classifier.predict_proba(features.as_slice())?;

    Ok(PredictionResult {
        canceled: cancel_probability >= threshold,
        cancel_probability,
        threshold,
    })
}

/// Live predictor backed by the form bundle
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    bundle: ModelBundle,
    config: InferenceConfig,
}

impl InferenceEngine {
    /// Create an engine; only form bundles are accepted
    pub fn new(bundle: ModelBundle, config: InferenceConfig) -> Result<Self, InferenceError> {
        bundle.expect_kind(BundleKind::Form)?;
        bundle.validate()?;
        config.validate()?;

        info!(
            "Creating inference engine: {} features, threshold={}",
            bundle.schema().len(),
            config.threshold
        );
        Ok(Self { bundle, config })
    }

    /// Predict one raw record
    pub fn predict(&self, record: &RawRecord) -> Result<PredictionResult, InferenceError> {
        let result = classify(record, &self.bundle, self.config.threshold)?;
        debug!(
            "Prediction: canceled={} p={:.4}",
            result.canceled, result.cancel_probability
        );
        Ok(result)
    }

    /// Predict from submitted form values
    pub fn predict_form(&self, form: &FormInput) -> Result<PredictionResult, InferenceError> {
        self.predict(&form.to_record())
    }

    /// Predict many records; fails on the first invalid one
    pub fn predict_batch(&self, records: &[RawRecord]) -> Result<Vec<PredictionResult>, InferenceError> {
        records.iter().map(|r| self.predict(r)).collect()
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }
}
