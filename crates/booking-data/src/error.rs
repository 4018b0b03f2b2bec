//! Data Error Types

use thiserror::Error;

/// Errors while loading or interpreting booking data
#[derive(Debug, Error)]
pub enum DataError {
    /// A required column is absent from the CSV header
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// A cell could not be parsed into the type its column requires
    #[error("Row {row}: invalid value {value:?} for column {column}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// Attribute requested that the dataset does not carry
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// Malformed month string in a filter
    #[error("Invalid month {0:?}, expected YYYY-MM")]
    InvalidMonth(String),

    /// Unknown hotel filter value
    #[error("Unknown hotel filter {0:?}")]
    UnknownHotel(String),

    /// The dataset contains no usable rows
    #[error("Dataset is empty")]
    Empty,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
