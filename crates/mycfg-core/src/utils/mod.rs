//! Helpers for config names, ids and per-user config directories.

use std::path::{Path, PathBuf};

use crate::constants::ID_PREFIX;
use crate::error::{Error, Result};
use crate::storage::error::StorageSystemError;

/// Check a config name. It becomes a directory name, so it must be non-empty
/// and free of `.` and path separators.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_argument("config name must not be empty"));
    }
    if name.contains('.') {
        return Err(Error::invalid_argument(format!(
            "config name '{}': punctuation not allowed",
            name
        )));
    }
    if name.contains(['/', '\\']) {
        return Err(Error::invalid_argument(format!(
            "config name '{}': slash not allowed",
            name
        )));
    }
    Ok(())
}

/// Generate a short instance id such as `mycfg_3f`
pub fn generate_id() -> String {
    format!("{}{:02x}", ID_PREFIX, rand::random::<u8>())
}

/// Per-user directory for the config called `name` on the current platform
pub fn default_dir(name: &str) -> Result<PathBuf> {
    validate_name(name)?;
    let home = dirs::home_dir().ok_or_else(|| StorageSystemError::OperationFailed {
        operation: "resolve_home_dir".to_string(),
        path: None,
        message: "home directory could not be determined".to_string(),
    })?;
    platform_dir(&home, name, std::env::consts::OS)
}

/// Directory layout for `os` (as named by `std::env::consts::OS`)
pub fn platform_dir(home: &Path, name: &str, os: &str) -> Result<PathBuf> {
    match os {
        "windows" => Ok(home.join("AppData").join("Local").join(name)),
        "linux" | "macos" => Ok(home.join(".config").join(name)),
        other => Err(Error::invalid_argument(format!(
            "unsupported platform: {}",
            other
        ))),
    }
}

/// Lower-cased file extension, if any
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}
