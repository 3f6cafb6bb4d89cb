//! # Hierarchical Store
//!
//! [`Store`] is an insertion-ordered map from string keys to [`Value`]s,
//! where a value may itself be a nested `Store`. Keys can be addressed
//! directly or through dotted paths (`"a.b.c"`).
//!
//! Nothing handed out by a `Store` aliases its live data: path lookups
//! return owned deep copies and iteration only lends shared borrows.

use indexmap::IndexMap;
use indexmap::map::{Iter, Keys};
use log::trace;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::value::Value;

/// Separator between segments of a dotted path
pub const PATH_SEPARATOR: char = '.';

/// Ordered string-keyed map of values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    entries: IndexMap<String, Value>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Number of keys at this level
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a key exists at this level (no path splitting)
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys at this level in insertion order
    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.entries.keys()
    }

    /// Iterate entries at this level in insertion order
    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Borrow the value stored directly under `key` (no path splitting)
    pub fn entry(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert directly under `key` (no path splitting), replacing any
    /// previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove the value stored directly under `key`, keeping the order of
    /// the remaining keys
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Remove every key
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Copy every top-level entry of `other` into this store, overwriting
    /// keys that already exist
    pub fn merge(&mut self, other: &Store) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Set `value` at a dotted path.
    ///
    /// Intermediate segments are created as empty stores when missing. An
    /// intermediate segment that holds a non-store value is replaced by a
    /// fresh empty store and its old value is discarded.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> bool {
        let mut segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        // split always yields at least one segment
        let last = segments.pop().unwrap_or_default();

        let mut current = self;
        for segment in segments {
            current = current.child_mut(segment);
        }
        current.entries.insert(last.to_string(), value.into());
        trace!("store set '{}'", path);
        true
    }

    /// Get a deep copy of the value at a dotted path.
    ///
    /// Returns `None` when any intermediate segment is missing or is not a
    /// store, even if a shorter prefix of the path names a leaf.
    pub fn get(&self, path: &str) -> Option<Value> {
        self.lookup(path).cloned()
    }

    /// Like [`Store::get`] but tolerant of a leading `.`; `"."` and `""`
    /// return a copy of the whole store as a map.
    pub fn query(&self, path: &str) -> Option<Value> {
        let path = path.strip_prefix(PATH_SEPARATOR).unwrap_or(path);
        if path.is_empty() {
            return Some(Value::Map(self.clone()));
        }
        self.get(path)
    }

    /// Delete the value at a dotted path.
    ///
    /// A single leading `.` is ignored. Returns `false` without touching
    /// anything when the containing store cannot be reached, otherwise
    /// whether the final key existed.
    pub fn delete(&mut self, path: &str) -> bool {
        let path = path.strip_prefix(PATH_SEPARATOR).unwrap_or(path);
        let mut segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        let last = segments.pop().unwrap_or_default();

        let mut current = self;
        for segment in segments {
            match current.entries.get_mut(segment) {
                Some(Value::Map(child)) => current = child,
                _ => return false,
            }
        }
        current.entries.shift_remove(last).is_some()
    }

    /// Borrowing path lookup shared by `get` and the codecs
    pub(crate) fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split(PATH_SEPARATOR).peekable();
        let mut current = self;
        while let Some(segment) = segments.next() {
            let value = current.entries.get(segment)?;
            if segments.peek().is_none() {
                return Some(value);
            }
            match value {
                Value::Map(child) => current = child,
                _ => return None,
            }
        }
        None
    }

    /// Mutable access to the child store under `key`, creating it (or
    /// replacing a non-store value) as needed
    pub(crate) fn child_mut(&mut self, key: &str) -> &mut Store {
        let slot = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Value::Map(Store::new()));
        as_child(slot)
    }

    /// Mutable access to the raw value under `key` (no path splitting)
    pub(crate) fn entry_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// JSON object view with null entries dropped at every map level
    pub fn to_json_object(&self) -> serde_json::Map<String, serde_json::Value> {
        self.entries
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect()
    }
}

/// View `slot` as a child store, replacing any other value with an empty one
fn as_child(slot: &mut Value) -> &mut Store {
    match slot {
        Value::Map(child) => child,
        other => {
            *other = Value::Map(Store::new());
            as_child(other)
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Store {
    fn from(object: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            entries: object
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Store {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Store {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Null entries are skipped so the serialized form matches `to_json_object`.
impl Serialize for Store {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present = self.entries.values().filter(|v| !v.is_null()).count();
        let mut map = serializer.serialize_map(Some(present))?;
        for (key, value) in &self.entries {
            if value.is_null() {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
