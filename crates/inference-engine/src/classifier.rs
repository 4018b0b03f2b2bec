//! Logistic Classifier Parameters

use crate::InferenceError;
use serde::{Deserialize, Serialize};

/// Fitted binary logistic regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// One coefficient per schema column
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    pub fn new(weights: Vec<f64>, intercept: f64) -> Self {
        Self { weights, intercept }
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Linear score `w·x + b`
    pub fn decision_function(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.weights.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: self.weights.len(),
                actual: features.len(),
            });
        }
        let dot: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();
        let score = dot + self.intercept;
        if !score.is_finite() {
            return Err(InferenceError::NonFiniteScore);
        }
        Ok(score)
    }

    /// Probability of the positive class
    pub fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceError> {
        self.decision_function(features).map(sigmoid)
    }
}

/// Logistic function, stable for large magnitudes
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
