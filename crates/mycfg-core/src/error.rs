//! # mycfg Core Errors
//!
//! Defines the crate-wide [`Error`] type and its [`Result`] alias.
//!
//! Store and codec operations are infallible or fail with
//! [`Error::InvalidArgument`] / [`Error::ParseFailure`]; everything that
//! touches the file system surfaces as [`Error::StorageSystem`] wrapping a
//! typed [`StorageSystemError`].
use std::path::PathBuf;
use std::result::Result as StdResult;

use crate::storage::error::StorageSystemError;
use thiserror::Error as ThisError;

/// Error type for all mycfg operations
#[derive(Debug, ThisError)]
pub enum Error {
    /// A caller-supplied argument was rejected (config name, option value)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Text could not be turned into a Store
    #[error("Failed to parse {format}: {message}")]
    ParseFailure { format: String, message: String },

    /// Specific, typed storage system error
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

// Specific code should prefer `Error::io` so the path and operation are kept.
impl From<std::io::Error> for Error {
    fn from(io_err: std::io::Error) -> Self {
        Error::StorageSystem(StorageSystemError::Io {
            source: io_err,
            path: PathBuf::new(),
            operation: "unknown".to_string(),
        })
    }
}

impl Error {
    /// Wrap an I/O error with the operation and path it happened on
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        Error::StorageSystem(StorageSystemError::io(source, operation, path))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// True when the error means "the file is not there"
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::StorageSystem(StorageSystemError::FileNotFound(_)) => true,
            Error::StorageSystem(StorageSystemError::Io { source, .. }) => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }

    /// True for an unsupported file extension
    pub fn is_unsupported_format(&self) -> bool {
        matches!(
            self,
            Error::StorageSystem(StorageSystemError::UnsupportedConfigFormat(_))
        )
    }
}
