//! Raw Records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of a raw attribute, decides how the encoder expands it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Passed through as a number
    Numeric,
    /// Expanded into one indicator per category
    Categorical,
}

/// Named attribute with its kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

impl Attribute {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Categorical,
        }
    }
}

/// Single attribute value before encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Missing,
}

impl RawValue {
    /// Cell strings that count as absent values
    const MISSING_MARKERS: [&'static str; 5] = ["", "NA", "NULL", "nan", "NaN"];

    /// Interpret a CSV cell for a column of the given kind
    pub fn from_cell(cell: &str, kind: AttributeKind) -> Self {
        let cell = cell.trim();
        if Self::is_missing_cell(cell) {
            return RawValue::Missing;
        }
        match kind {
            AttributeKind::Numeric => cell
                .parse::<f64>()
                .map(RawValue::Number)
                .unwrap_or_else(|_| RawValue::Text(cell.to_string())),
            AttributeKind::Categorical => RawValue::Text(cell.to_string()),
        }
    }

    pub fn is_missing_cell(cell: &str) -> bool {
        Self::MISSING_MARKERS.contains(&cell.trim())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Missing)
    }
}

/// One booking's attributes keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    values: BTreeMap<String, RawValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Value of an attribute; absent attributes read as `None`
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }

    /// Copy of this record restricted to the named attributes
    pub fn project(&self, names: &[&str]) -> RawRecord {
        let values = names
            .iter()
            .filter_map(|name| {
                self.values
                    .get(*name)
                    .map(|value| (name.to_string(), value.clone()))
            })
            .collect();
        RawRecord { values }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
