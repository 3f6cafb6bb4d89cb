//! # mycfg Storage System Errors
//!
//! Defines error types specific to reading and writing config files.
//!
//! [`StorageSystemError`] covers file I/O, missing files, unsupported
//! extensions and serialization failures raised while loading or saving a
//! [`Config`](crate::storage::Config).
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageSystemError {
    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found at path: {0}")]
    FileNotFound(PathBuf),

    #[error("Serialization to '{format}' failed: {source}")]
    SerializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Unsupported configuration format for '{0}': only ini/json supported")]
    UnsupportedConfigFormat(PathBuf),

    #[error("Storage operation '{operation}' failed for path '{}': {message}", path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<unknown>".into()))]
    OperationFailed {
        operation: String,
        path: Option<PathBuf>,
        message: String,
    },

}

impl StorageSystemError {
    /// Build an `Io` error, mapping a missing file to `FileNotFound`
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return StorageSystemError::FileNotFound(path);
        }
        StorageSystemError::Io {
            source,
            operation: operation.into(),
            path,
        }
    }
}
