//! Feature Encoder

use crate::error::EncoderError;
use crate::schema::{ColumnKind, FeatureColumn, FeatureSchema};
use crate::statistics::ColumnStatistics;
use booking_data::{Attribute, AttributeKind, RawRecord, RawValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Handling of absent numeric values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingNumeric {
    /// Fail with `SchemaMismatch`
    #[default]
    Reject,
    /// Substitute the training-time mean
    TrainingMean,
}

/// Encoder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Standardize numeric columns with training mean/scale
    pub standardize: bool,
    /// Drop the first category of every categorical attribute as baseline
    pub drop_first: bool,
    /// What to do when a numeric attribute is absent
    pub missing_numeric: MissingNumeric,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            standardize: true,
            drop_first: false,
            missing_numeric: MissingNumeric::Reject,
        }
    }
}

/// Encoded record aligned to a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Fitted encoder: vocabulary, numeric statistics and the resulting schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoder {
    config: EncoderConfig,
    attributes: Vec<Attribute>,
    /// Categories per categorical attribute, sorted, baseline already dropped
    vocabulary: BTreeMap<String, Vec<String>>,
    /// Statistics per numeric attribute
    statistics: BTreeMap<String, ColumnStatistics>,
    schema: FeatureSchema,
}

impl FeatureEncoder {
    /// Learn vocabulary and statistics from training records
    pub fn fit<'a, I>(
        records: I,
        attributes: &[Attribute],
        config: EncoderConfig,
    ) -> Result<Self, EncoderError>
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let records: Vec<&RawRecord> = records.into_iter().collect();
        if records.is_empty() {
            return Err(EncoderError::EmptyInput);
        }

        let mut statistics = BTreeMap::new();
        let mut vocabulary = BTreeMap::new();

        for attribute in attributes {
            match attribute.kind {
                AttributeKind::Numeric => {
                    let mut values = Vec::with_capacity(records.len());
                    for record in &records {
                        match numeric_value(record, &attribute.name)? {
                            Some(v) => values.push(v),
                            None if config.missing_numeric == MissingNumeric::Reject => {
                                return Err(EncoderError::SchemaMismatch {
                                    attribute: attribute.name.clone(),
                                });
                            }
                            None => {}
                        }
                    }
                    statistics.insert(attribute.name.clone(), ColumnStatistics::compute(&values));
                }
                AttributeKind::Categorical => {
                    let mut seen = BTreeSet::new();
                    for record in &records {
                        if let Some(category) = categorical_value(record, &attribute.name)? {
                            seen.insert(category);
                        }
                    }
                    let skip = usize::from(config.drop_first);
                    let categories: Vec<String> = seen.into_iter().skip(skip).collect();
                    vocabulary.insert(attribute.name.clone(), categories);
                }
            }
        }

        let schema = build_schema(attributes, &vocabulary);
        info!(
            "Fitted encoder on {} records: {} attributes -> {} features",
            records.len(),
            attributes.len(),
            schema.len()
        );

        Ok(Self {
            config,
            attributes: attributes.to_vec(),
            vocabulary,
            statistics,
            schema,
        })
    }

    /// Schema established at fit time
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Categories learned for an attribute
    pub fn categories(&self, attribute: &str) -> Option<&[String]> {
        self.vocabulary.get(attribute).map(Vec::as_slice)
    }

    /// Training statistics for a numeric attribute
    pub fn statistics(&self, attribute: &str) -> Option<&ColumnStatistics> {
        self.statistics.get(attribute)
    }

    /// Encode records against `schema`, or the fitted schema when `None`.
    ///
    /// Output columns always follow the target schema exactly: categories the
    /// schema does not know are dropped and schema columns the record cannot
    /// produce are zero.
    pub fn encode(
        &self,
        records: &[RawRecord],
        schema: Option<&FeatureSchema>,
    ) -> Result<(Vec<FeatureVector>, FeatureSchema), EncoderError> {
        let target = schema.unwrap_or(&self.schema);
        let vectors = records
            .iter()
            .map(|record| self.encode_with(record, target))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Encoded {} records into {} columns", vectors.len(), target.len());
        Ok((vectors, target.clone()))
    }

    /// Encode a single record against the fitted schema
    pub fn encode_one(&self, record: &RawRecord) -> Result<FeatureVector, EncoderError> {
        self.encode_with(record, &self.schema)
    }

    /// Encode a single record, reindexed to `schema`
    pub fn encode_with(
        &self,
        record: &RawRecord,
        schema: &FeatureSchema,
    ) -> Result<FeatureVector, EncoderError> {
        // Categorical values resolved once per base attribute
        let mut categories: BTreeMap<&str, Option<String>> = BTreeMap::new();
        let mut values = Vec::with_capacity(schema.len());

        for column in schema.columns() {
            let value = match &column.kind {
                ColumnKind::Numeric => self.numeric_feature(record, column)?,
                ColumnKind::Indicator { category } => {
                    if !categories.contains_key(column.base.as_str()) {
                        let resolved = categorical_value(record, &column.base)?;
                        categories.insert(column.base.as_str(), resolved);
                    }
                    match categories.get(column.base.as_str()) {
                        Some(Some(value)) if value == category => 1.0,
                        _ => 0.0,
                    }
                }
            };
            values.push(value);
        }

        Ok(FeatureVector { values })
    }

    fn numeric_feature(
        &self,
        record: &RawRecord,
        column: &FeatureColumn,
    ) -> Result<f64, EncoderError> {
        let stats = self.statistics.get(&column.base);
        let raw = match numeric_value(record, &column.base)? {
            Some(v) => v,
            None => match (self.config.missing_numeric, stats) {
                (MissingNumeric::TrainingMean, Some(stats)) => stats.mean,
                (MissingNumeric::TrainingMean, None) => 0.0,
                (MissingNumeric::Reject, _) => {
                    return Err(EncoderError::SchemaMismatch {
                        attribute: column.base.clone(),
                    })
                }
            },
        };

        let value = match stats {
            Some(stats) if self.config.standardize => stats.standardize(raw),
            _ => raw,
        };
        if !value.is_finite() {
            return Err(EncoderError::Encoding {
                attribute: column.base.clone(),
                reason: format!("{} is out of range", raw),
            });
        }
        Ok(value)
    }
}

fn build_schema(attributes: &[Attribute], vocabulary: &BTreeMap<String, Vec<String>>) -> FeatureSchema {
    // Numeric columns first, then indicator blocks, each in attribute order
    let mut columns: Vec<FeatureColumn> = attributes
        .iter()
        .filter(|a| a.kind == AttributeKind::Numeric)
        .map(|a| FeatureColumn::numeric(&a.name))
        .collect();

    for attribute in attributes.iter().filter(|a| a.kind == AttributeKind::Categorical) {
        if let Some(categories) = vocabulary.get(&attribute.name) {
            columns.extend(
                categories
                    .iter()
                    .map(|c| FeatureColumn::indicator(&attribute.name, c)),
            );
        }
    }

    FeatureSchema::new(columns)
}

/// Numeric reading of an attribute; `None` when absent
fn numeric_value(record: &RawRecord, attribute: &str) -> Result<Option<f64>, EncoderError> {
    match record.get(attribute) {
        None | Some(RawValue::Missing) => Ok(None),
        Some(RawValue::Number(v)) if v.is_nan() => Ok(None),
        Some(RawValue::Number(v)) if v.is_infinite() => Err(EncoderError::Encoding {
            attribute: attribute.to_string(),
            reason: "value is not finite".to_string(),
        }),
        Some(RawValue::Number(v)) => Ok(Some(*v)),
        Some(RawValue::Bool(b)) => Ok(Some(if *b { 1.0 } else { 0.0 })),
        Some(RawValue::Text(s)) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(EncoderError::Encoding {
                attribute: attribute.to_string(),
                reason: format!("{:?} is not a finite number", s),
            }),
        },
    }
}

/// String reading of a categorical attribute; `None` when absent
fn categorical_value(record: &RawRecord, attribute: &str) -> Result<Option<String>, EncoderError> {
    match record.get(attribute) {
        None | Some(RawValue::Missing) => Ok(None),
        Some(RawValue::Text(s)) => Ok(Some(s.clone())),
        Some(RawValue::Bool(b)) => Ok(Some(if *b { "True" } else { "False" }.to_string())),
        Some(RawValue::Number(v)) if !v.is_finite() => Err(EncoderError::Encoding {
            attribute: attribute.to_string(),
            reason: format!("{} cannot be used as a category", v),
        }),
        Some(RawValue::Number(v)) if v.fract() == 0.0 && v.abs() < 1e15 => {
            Ok(Some(format!("{}", *v as i64)))
        }
        Some(RawValue::Number(v)) => Ok(Some(v.to_string())),
    }
}
