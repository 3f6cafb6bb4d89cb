use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Platform name that selects CRLF line endings
pub const WINDOWS_PLATFORM: &str = "win32";

/// Options controlling INI output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncodeOptions {
    /// Pad keys so the separators line up (implies `whitespace`)
    pub align: bool,
    /// Blank line after each section header
    pub newline: bool,
    /// Emit keys in lexicographic order instead of insertion order
    pub sort: bool,
    /// Use `" = "` instead of `"="` between key and value
    pub whitespace: bool,
    /// `"win32"` selects CRLF, anything else LF
    pub platform: String,
    /// Write array elements as `key[]=value` instead of repeating `key=value`
    pub bracketed_array: bool,
    /// Section path prefix; a header is written for it when set
    pub section: Option<String>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            align: false,
            newline: false,
            sort: false,
            whitespace: false,
            platform: host_platform().to_string(),
            bracketed_array: true,
            section: None,
        }
    }
}

impl EncodeOptions {
    /// Parse options from a JSON object such as
    /// `{"align": true, "platform": "win32"}`; missing fields keep their
    /// defaults.
    pub fn from_json(options: &serde_json::Value) -> Result<Self> {
        Self::deserialize(options)
            .map_err(|e| Error::invalid_argument(format!("invalid encode options: {}", e)))
    }

    /// Line terminator for the configured platform
    pub fn eol(&self) -> &'static str {
        if self.platform == WINDOWS_PLATFORM {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// Key/value separator; `align` forces the padded form
    pub fn separator(&self) -> &'static str {
        if self.whitespace || self.align {
            " = "
        } else {
            "="
        }
    }
}

/// Options controlling INI input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecodeOptions {
    /// Treat `key[]` as array-typed; when off, repeated keys become arrays
    pub bracketed_array: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            bracketed_array: true,
        }
    }
}

impl DecodeOptions {
    pub fn from_json(options: &serde_json::Value) -> Result<Self> {
        Self::deserialize(options)
            .map_err(|e| Error::invalid_argument(format!("invalid decode options: {}", e)))
    }
}

/// Platform name in the form the `platform` option expects
pub fn host_platform() -> &'static str {
    if cfg!(windows) {
        WINDOWS_PLATFORM
    } else {
        std::env::consts::OS
    }
}
