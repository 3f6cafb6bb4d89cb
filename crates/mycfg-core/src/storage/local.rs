use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::trace;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::storage::error::StorageSystemError;
use crate::storage::provider::StorageProvider;

/// Local filesystem storage provider
#[derive(Clone)]
pub struct LocalStorageProvider {
    base_path: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider with the given base path.
    /// Absolute paths passed to the provider ignore the base path.
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a relative path against the base path
    fn resolve_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Default for LocalStorageProvider {
    /// Provider that resolves paths against the working directory
    fn default() -> Self {
        Self::new(PathBuf::new())
    }
}

impl StorageProvider for LocalStorageProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve_path(path).exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.resolve_path(path).is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve_path(path).is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let full_path = self.resolve_path(path);
        fs::create_dir_all(&full_path).map_err(|e| Error::io(e, "create_dir_all", full_path))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let full_path = self.resolve_path(path);
        trace!("local read {}", full_path.display());
        fs::read_to_string(&full_path).map_err(|e| Error::io(e, "read_to_string", full_path))
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        let full_path = self.resolve_path(path);
        trace!("local write {} ({} bytes)", full_path.display(), contents.len());

        let parent = match full_path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
            Some(parent) => {
                if !parent.is_dir() {
                    fs::create_dir_all(parent)
                        .map_err(|e| Error::io(e, "create_dir_all", parent.to_path_buf()))?;
                }
                parent.to_path_buf()
            }
            None => {
                return Err(StorageSystemError::OperationFailed {
                    operation: "write_string".to_string(),
                    path: Some(full_path),
                    message: "Cannot write to path without parent directory".to_string(),
                }
                .into());
            }
        };

        // Temp file in the target directory so persist is a same-filesystem rename
        let mut temp_file = NamedTempFile::new_in(&parent)
            .map_err(|e| Error::io(e, "create_temp_file", parent.clone()))?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| Error::io(e, "write_to_temp_file", temp_file.path().to_path_buf()))?;

        temp_file
            .persist(&full_path)
            .map_err(|e| Error::io(e.error, "persist_temp_file", full_path.clone()))?;

        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let full_path = self.resolve_path(path);
        fs::remove_file(&full_path).map_err(|e| Error::io(e, "remove_file", full_path))
    }
}

impl fmt::Debug for LocalStorageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStorageProvider")
            .field("base_path", &self.base_path)
            .finish()
    }
}
