//! Coefficient Importances

use feature_engine::FeatureSchema;
use inference_engine::{FeatureImportance, LogisticModel};

/// `|coefficient|` per schema column, in schema order
pub fn feature_importances(schema: &FeatureSchema, model: &LogisticModel) -> Vec<FeatureImportance> {
    schema
        .columns()
        .iter()
        .zip(&model.weights)
        .map(|(column, &coefficient)| FeatureImportance {
            feature: column.name.clone(),
            base: column.base.clone(),
            coefficient,
            importance: coefficient.abs(),
        })
        .collect()
}
