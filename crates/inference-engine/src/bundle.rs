//! Trained Model Bundle

use crate::classifier::LogisticModel;
use crate::InferenceError;
use feature_engine::{FeatureEncoder, FeatureSchema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which feature set a bundle was trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleKind {
    /// All dataset features, used for importances and metrics
    Reporting,
    /// The four fields collected by the prediction form
    Form,
}

impl BundleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleKind::Reporting => "reporting",
            BundleKind::Form => "form",
        }
    }
}

/// Confusion counts on the held-out partition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionCounts {
    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }
}

/// Held-out evaluation metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub confusion: ConfusionCounts,
}

/// How the optimizer finished
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub iterations: usize,
    pub converged: bool,
    pub train_size: usize,
    pub test_size: usize,
    pub seed: u64,
}

/// Importance of one encoded feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub base: String,
    /// Signed fitted coefficient
    pub coefficient: f64,
    /// `|coefficient|`
    pub importance: f64,
}

/// Importance summed over all columns of a base attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseImportance {
    pub base: String,
    pub importance: f64,
}

/// Sum importances over the columns of each base attribute, largest first
pub fn aggregate_by_base(importances: &[FeatureImportance]) -> Vec<BaseImportance> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for item in importances {
        *totals.entry(item.base.as_str()).or_insert(0.0) += item.importance;
    }

    let mut aggregated: Vec<BaseImportance> = totals
        .into_iter()
        .map(|(base, importance)| BaseImportance {
            base: base.to_string(),
            importance,
        })
        .collect();
    // Stable sort keeps ties in name order
    aggregated.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    aggregated
}

/// Everything produced by one training run; read-only afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub kind: BundleKind,
    pub classifier: LogisticModel,
    pub encoder: FeatureEncoder,
    pub metrics: EvaluationMetrics,
    pub training: TrainingSummary,
    /// Per encoded feature, in schema order
    pub importances: Vec<FeatureImportance>,
    /// Per base attribute, descending
    pub base_importances: Vec<BaseImportance>,
}

impl ModelBundle {
    /// Schema the classifier was fitted against
    pub fn schema(&self) -> &FeatureSchema {
        self.encoder.schema()
    }

    /// Check that classifier, schema and importances line up
    pub fn validate(&self) -> Result<(), InferenceError> {
        let schema = self.schema();
        if self.classifier.n_features() != schema.len() {
            return Err(InferenceError::InvalidBundle(format!(
                "classifier has {} weights but schema has {} columns",
                self.classifier.n_features(),
                schema.len()
            )));
        }
        let aligned = self.importances.len() == schema.len()
            && self
                .importances
                .iter()
                .zip(schema.columns())
                .all(|(imp, col)| imp.feature == col.name && imp.base == col.base);
        if !aligned {
            return Err(InferenceError::InvalidBundle(
                "feature importances do not follow the schema".to_string(),
            ));
        }
        Ok(())
    }

    /// Fail unless this bundle is of the expected kind
    pub fn expect_kind(&self, expected: BundleKind) -> Result<(), InferenceError> {
        if self.kind != expected {
            return Err(InferenceError::BundleKindMismatch {
                expected,
                actual: self.kind,
            });
        }
        Ok(())
    }
}
