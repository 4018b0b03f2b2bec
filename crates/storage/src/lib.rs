//! Storage Layer
//!
//! Persists trained model bundles as versioned binary blobs.

mod bundle_store;

pub use bundle_store::{
    decode_bundle, encode_bundle, BundleStore, StoreConfig, FORMAT_VERSION, MAGIC,
};

use inference_engine::{BundleKind, InferenceError};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Unrecognized bundle format: {0}")]
    Format(String),
    #[error("Expected a {expected:?} bundle but found {actual:?}")]
    KindMismatch {
        expected: BundleKind,
        actual: BundleKind,
    },
    #[error("Stored bundle is inconsistent: {0}")]
    Inconsistent(#[from] InferenceError),
}
