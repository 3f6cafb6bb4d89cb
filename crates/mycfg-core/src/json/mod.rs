//! # JSON codec
//!
//! Compact JSON form of a [`Store`]. Key order follows insertion order on
//! both sides and null map entries are not written.

use log::debug;

use crate::error::{Error, Result};
use crate::storage::error::StorageSystemError;
use crate::store::Store;

const FORMAT: &str = "json";

/// Serialize a Store as compact JSON text
pub fn encode(store: &Store) -> Result<String> {
    let text = serde_json::to_string(store).map_err(serialization_error)?;
    debug!("json encode: {} keys -> {} bytes", store.len(), text.len());
    Ok(text)
}

/// Parse JSON text into a new Store. The root must be an object.
pub fn decode(text: &str) -> Result<Store> {
    let json: serde_json::Value = serde_json::from_str(text).map_err(|e| Error::ParseFailure {
        format: FORMAT.to_string(),
        message: e.to_string(),
    })?;
    match json {
        serde_json::Value::Object(object) => {
            debug!("json decode: {} bytes -> {} keys", text.len(), object.len());
            Ok(Store::from(object))
        }
        other => Err(Error::ParseFailure {
            format: FORMAT.to_string(),
            message: format!("expected an object at the root, found {}", json_kind(&other)),
        }),
    }
}

/// Parse JSON text and merge its top-level keys into `store`.
/// On failure `store` is left as it was.
pub fn decode_into(text: &str, store: &mut Store) -> Result<()> {
    let parsed = decode(text)?;
    store.merge(&parsed);
    Ok(())
}

pub(crate) fn serialization_error(source: serde_json::Error) -> Error {
    StorageSystemError::SerializationError {
        format: FORMAT.to_string(),
        source: Box::new(source),
    }
    .into()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
