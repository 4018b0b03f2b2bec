//! Encoder Error Types

use thiserror::Error;

/// Errors raised while fitting or applying the feature encoder
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncoderError {
    /// A record lacks an attribute the schema requires
    #[error("Schema mismatch: required attribute {attribute} is missing")]
    SchemaMismatch { attribute: String },

    /// A value cannot be represented in its column
    #[error("Cannot encode {attribute}: {reason}")]
    Encoding { attribute: String, reason: String },

    /// Fit called without records
    #[error("No records to fit the encoder on")]
    EmptyInput,
}

impl EncoderError {
    /// Name of the attribute the error refers to, if any
    pub fn attribute(&self) -> Option<&str> {
        match self {
            EncoderError::SchemaMismatch { attribute } => Some(attribute),
            EncoderError::Encoding { attribute, .. } => Some(attribute),
            EncoderError::EmptyInput => None,
        }
    }
}
