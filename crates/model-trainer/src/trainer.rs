//! Training Pipeline

use crate::config::TrainerConfig;
use crate::importance::feature_importances;
use crate::metrics::evaluate;
use crate::optimizer::{fit_logistic, OptimizerSettings};
use crate::split::stratified_split;
use crate::TrainerError;
use booking_data::{columns, Attribute, Dataset, LabeledRecord};
use feature_engine::{EncoderConfig, FeatureEncoder, MissingNumeric};
use inference_engine::{
    aggregate_by_base, BundleKind, InferenceConfig, ModelBundle, TrainingSummary,
};
use ndarray::{Array1, Array2};
use std::fmt;
use tracing::{info, warn};

/// Optimizer stopped at the iteration cap; the bundle is still usable
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceWarning {
    pub kind: BundleKind,
    pub iterations: usize,
    pub gradient_norm: f64,
}

impl fmt::Display for ConvergenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} model did not converge after {} iterations (gradient norm {:.2e})",
            self.kind.as_str(),
            self.iterations,
            self.gradient_norm
        )
    }
}

/// A trained bundle plus anything worth telling the operator
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub bundle: ModelBundle,
    pub warnings: Vec<ConvergenceWarning>,
}

/// Trains bundles with a fixed split and optimizer configuration
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Result<Self, TrainerError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Reporting bundle: every column except the label and the exclusion list
    pub fn train_reporting(&self, dataset: &Dataset) -> Result<TrainingOutcome, TrainerError> {
        let attributes = dataset.attributes_excluding(&self.config.exclude_columns);
        let records = dataset.labeled_records(&attributes);
        let encoder_config = EncoderConfig {
            standardize: true,
            drop_first: false,
            missing_numeric: MissingNumeric::TrainingMean,
        };
        self.train(BundleKind::Reporting, &records, &attributes, encoder_config)
    }

    /// Form bundle: the four fields the prediction form collects
    pub fn train_form(&self, dataset: &Dataset) -> Result<TrainingOutcome, TrainerError> {
        dataset.select_attributes(&columns::FORM_ATTRIBUTES)?;
        let attributes = vec![
            Attribute::numeric(columns::PARKING_SPACES),
            Attribute::numeric(columns::ADR),
            Attribute::numeric(columns::PREVIOUS_CANCELLATIONS),
            Attribute::categorical(columns::DEPOSIT_TYPE),
        ];
        let records = dataset.labeled_records(&attributes);
        self.train(BundleKind::Form, &records, &attributes, EncoderConfig::default())
    }

    /// Split, fit the encoder on the training rows, fit and evaluate the classifier
    pub fn train(
        &self,
        kind: BundleKind,
        records: &[LabeledRecord],
        attributes: &[Attribute],
        encoder_config: EncoderConfig,
    ) -> Result<TrainingOutcome, TrainerError> {
        if attributes.is_empty() {
            return Err(TrainerError::NoAttributes);
        }

        info!(
            "Training {} model on {} records with {} attributes",
            kind.as_str(),
            records.len(),
            attributes.len()
        );

        let labels: Vec<bool> = records.iter().map(|r| r.label).collect();
        let split = stratified_split(&labels, self.config.test_fraction, self.config.seed)?;

        // Vocabulary and statistics come from the training rows only
        let encoder = FeatureEncoder::fit(
            split.train.iter().map(|&i| &records[i].record),
            attributes,
            encoder_config,
        )?;

        let (x_train, y_train) = design_matrix(&encoder, records, &split.train)?;
        let settings = OptimizerSettings {
            regularization: self.config.regularization,
            max_iterations: self.config.max_iterations,
            tolerance: self.config.tolerance,
        };
        let fit = fit_logistic(&x_train, &y_train, &settings)?;

        let threshold = InferenceConfig::default().threshold;
        let mut predicted = Vec::with_capacity(split.test.len());
        for &i in &split.test {
            let features = encoder.encode_one(&records[i].record)?;
            predicted.push(fit.model.predict_proba(features.as_slice())? >= threshold);
        }
        let actual: Vec<bool> = split.test.iter().map(|&i| labels[i]).collect();
        let metrics = evaluate(&actual, &predicted);

        let importances = feature_importances(encoder.schema(), &fit.model);
        let base_importances = aggregate_by_base(&importances);

        let mut warnings = Vec::new();
        if !fit.converged {
            let warning = ConvergenceWarning {
                kind,
                iterations: fit.iterations,
                gradient_norm: fit.gradient_norm,
            };
            warn!("{}", warning);
            warnings.push(warning);
        }

        let bundle = ModelBundle {
            kind,
            classifier: fit.model,
            encoder,
            metrics,
            training: TrainingSummary {
                iterations: fit.iterations,
                converged: fit.converged,
                train_size: split.train.len(),
                test_size: split.test.len(),
                seed: self.config.seed,
            },
            importances,
            base_importances,
        };
        bundle.validate()?;

        info!(
            "Trained {} model: accuracy={:.4} precision={:.4} recall={:.4} ({} features)",
            kind.as_str(),
            metrics.accuracy,
            metrics.precision,
            metrics.recall,
            bundle.schema().len()
        );

        Ok(TrainingOutcome { bundle, warnings })
    }
}

/// Train the reporting bundle with default settings
pub fn train(dataset: &Dataset) -> Result<TrainingOutcome, TrainerError> {
    Trainer::default().train_reporting(dataset)
}

fn design_matrix(
    encoder: &FeatureEncoder,
    records: &[LabeledRecord],
    rows: &[usize],
) -> Result<(Array2<f64>, Array1<f64>), TrainerError> {
    let width = encoder.schema().len();
    let mut flat = Vec::with_capacity(rows.len() * width);
    let mut targets = Vec::with_capacity(rows.len());

    for &i in rows {
        let vector = encoder.encode_one(&records[i].record)?;
        flat.extend_from_slice(vector.as_slice());
        targets.push(if records[i].label { 1.0 } else { 0.0 });
    }

    let x = Array2::from_shape_vec((rows.len(), width), flat)
        .map_err(|e| TrainerError::Matrix(e.to_string()))?;
    Ok((x, Array1::from_vec(targets)))
}
