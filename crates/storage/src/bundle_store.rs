//! Bundle Store Implementation

use crate::StorageError;
use inference_engine::{BundleKind, ModelBundle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File signature of a stored bundle
pub const MAGIC: &[u8; 4] = b"HCMB";
/// Layout version written after the signature
pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = MAGIC.len() + 1;

/// Serialize a bundle into a self-describing blob
pub fn encode_bundle(bundle: &ModelBundle) -> Result<Vec<u8>, StorageError> {
    let payload = postcard::to_allocvec(bundle)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;

    let mut blob = Vec::with_capacity(HEADER_LEN + payload.len());
    blob.extend_from_slice(MAGIC);
    blob.push(FORMAT_VERSION);
    blob.extend_from_slice(&payload);
    Ok(blob)
}

/// Parse a blob written by [`encode_bundle`] and check its consistency
pub fn decode_bundle(blob: &[u8]) -> Result<ModelBundle, StorageError> {
    if blob.len() < HEADER_LEN || &blob[..MAGIC.len()] != MAGIC {
        return Err(StorageError::Format("missing bundle signature".to_string()));
    }
    let version = blob[MAGIC.len()];
    if version != FORMAT_VERSION {
        return Err(StorageError::Format(format!(
            "unsupported format version {}",
            version
        )));
    }

    let bundle: ModelBundle = postcard::from_bytes(&blob[HEADER_LEN..])
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    bundle.validate()?;
    Ok(bundle)
}

/// Bundle file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub reporting_path: PathBuf,
    pub form_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            reporting_path: PathBuf::from("models/model.bin"),
            form_path: PathBuf::from("models/form_model.bin"),
        }
    }
}

/// Locations of the reporting and form bundles
#[derive(Debug, Clone)]
pub struct BundleStore {
    reporting_path: PathBuf,
    form_path: PathBuf,
}

impl BundleStore {
    pub fn new(reporting_path: impl Into<PathBuf>, form_path: impl Into<PathBuf>) -> Self {
        Self {
            reporting_path: reporting_path.into(),
            form_path: form_path.into(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.reporting_path.clone(), config.form_path.clone())
    }

    /// File a bundle of the given kind lives in
    pub fn path_for(&self, kind: BundleKind) -> &Path {
        match kind {
            BundleKind::Reporting => &self.reporting_path,
            BundleKind::Form => &self.form_path,
        }
    }

    /// Write a bundle to the file for its kind
    pub fn save(&self, bundle: &ModelBundle) -> Result<(), StorageError> {
        let path = self.path_for(bundle.kind);
        let blob = encode_bundle(bundle)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write beside the target, then rename so readers never see a partial file
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &blob)?;
        fs::rename(&tmp, path)?;

        info!(
            "Saved {} bundle to {} ({} bytes)",
            bundle.kind.as_str(),
            path.display(),
            blob.len()
        );
        Ok(())
    }

    /// Read the bundle of the given kind
    pub fn load(&self, kind: BundleKind) -> Result<ModelBundle, StorageError> {
        let path = self.path_for(kind);
        debug!("Loading {} bundle from {}", kind.as_str(), path.display());

        let blob = fs::read(path)?;
        let bundle = decode_bundle(&blob)?;
        if bundle.kind != kind {
            return Err(StorageError::KindMismatch {
                expected: kind,
                actual: bundle.kind,
            });
        }

        info!(
            "Loaded {} bundle: {} features, accuracy={:.3}",
            kind.as_str(),
            bundle.schema().len(),
            bundle.metrics.accuracy
        );
        Ok(bundle)
    }
}
