//! Feature Schema

use serde::{Deserialize, Serialize};

/// How a feature column is produced from its base attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Numeric attribute value, possibly standardized
    Numeric,
    /// 1.0 when the base attribute equals `category`, else 0.0
    Indicator { category: String },
}

/// One encoded column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureColumn {
    /// Encoded name, `{base}_{category}` for indicators
    pub name: String,
    /// Raw attribute the column derives from
    pub base: String,
    pub kind: ColumnKind,
}

impl FeatureColumn {
    pub fn numeric(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            name: base.clone(),
            base,
            kind: ColumnKind::Numeric,
        }
    }

    pub fn indicator(base: impl Into<String>, category: impl Into<String>) -> Self {
        let base = base.into();
        let category = category.into();
        Self {
            name: format!("{}_{}", base, category),
            base,
            kind: ColumnKind::Indicator { category },
        }
    }

    pub fn is_indicator(&self) -> bool {
        matches!(self.kind, ColumnKind::Indicator { .. })
    }
}

/// Ordered list of encoded columns fixed at training time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<FeatureColumn>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Base attribute names in first-appearance order
    pub fn base_features(&self) -> Vec<&str> {
        let mut bases: Vec<&str> = Vec::new();
        for column in &self.columns {
            if !bases.contains(&column.base.as_str()) {
                bases.push(&column.base);
            }
        }
        bases
    }

    /// True when both schemas have the same names in the same order
    pub fn is_compatible_with(&self, other: &FeatureSchema) -> bool {
        self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(&other.columns)
                .all(|(a, b)| a.name == b.name)
    }
}
