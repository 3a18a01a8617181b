//! CRD crate errors

use thiserror::Error;

/// Errors that can occur when rendering or writing CRD manifests
#[derive(Debug, Error)]
pub enum CrdError {
    /// YAML serialization error
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Failed to write the manifest
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
