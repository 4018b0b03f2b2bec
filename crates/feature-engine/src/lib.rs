//! Feature Engineering Engine
//!
//! Turns raw booking records into fixed-order numeric feature vectors. The
//! encoder learns category vocabularies and numeric statistics once, at
//! training time, and every later encoding is driven by the persisted
//! [`FeatureSchema`].

mod encoder;
mod error;
mod schema;
mod statistics;

pub use encoder::{EncoderConfig, FeatureEncoder, FeatureVector, MissingNumeric};
pub use error::EncoderError;
pub use schema::{ColumnKind, FeatureColumn, FeatureSchema};
pub use statistics::ColumnStatistics;
