use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};

use crate::constants::CONFIG_FILE_NAME;
use crate::error::{Error, Result};
use crate::ini::{self, DecodeOptions, EncodeOptions};
use crate::json;
use crate::storage::error::StorageSystemError;
use crate::storage::local::LocalStorageProvider;
use crate::storage::provider::StorageProvider;
use crate::store::Store;
use crate::utils;
use crate::value::Value;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// INI format (.ini)
    Ini,
    /// JSON format (.json)
    Json,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Ini => "ini",
            ConfigFormat::Json => "json",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match utils::file_extension(path)?.as_str() {
            "ini" => Some(ConfigFormat::Ini),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Like [`ConfigFormat::from_path`], failing with
    /// `UnsupportedConfigFormat` for anything else
    pub fn require(path: &Path) -> Result<Self> {
        Self::from_path(path)
            .ok_or_else(|| StorageSystemError::UnsupportedConfigFormat(path.to_path_buf()).into())
    }

    /// Serialize a store in this format
    pub fn serialize(&self, store: &Store) -> Result<String> {
        match self {
            ConfigFormat::Ini => Ok(ini::encode(store, &EncodeOptions::default())),
            ConfigFormat::Json => json::encode(store),
        }
    }

    /// Deserialize text in this format into a new store
    pub fn deserialize(&self, text: &str) -> Result<Store> {
        match self {
            ConfigFormat::Ini => Ok(ini::decode(text, &DecodeOptions::default())),
            ConfigFormat::Json => json::decode(text),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Construction options for [`Config`]
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// Config name; also the directory name under the per-user config dir
    pub name: String,
    /// Directory holding `config.ini`, overriding the per-user default
    pub dir: Option<PathBuf>,
    /// Initial contents, copied into the new config
    pub data: Option<Store>,
}

/// A named configuration: one root [`Store`] plus the bookkeeping needed to
/// persist it.
#[derive(Debug, Clone)]
pub struct Config {
    id: String,
    name: String,
    dir: Option<PathBuf>,
    data: Store,
    dirty: Vec<String>,
    provider: Arc<dyn StorageProvider>,
}

impl Config {
    /// Create an empty config called `name`
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::from_options(ConfigOptions {
            name: name.into(),
            ..Default::default()
        })
    }

    /// Create a config holding a copy of `data`
    pub fn with_data(name: impl Into<String>, data: &Store) -> Result<Self> {
        Self::from_options(ConfigOptions {
            name: name.into(),
            data: Some(data.clone()),
            ..Default::default()
        })
    }

    pub fn from_options(options: ConfigOptions) -> Result<Self> {
        utils::validate_name(&options.name)?;
        let config = Self {
            id: utils::generate_id(),
            name: options.name,
            dir: options.dir,
            data: options.data.unwrap_or_default(),
            dirty: Vec::new(),
            provider: Arc::new(LocalStorageProvider::default()),
        };
        debug!(
            "[{}] created config '{}' with {} keys",
            config.id,
            config.name,
            config.data.len()
        );
        Ok(config)
    }

    /// Replace the storage provider used by load and save
    pub fn with_provider(mut self, provider: Arc<dyn StorageProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn provider(&self) -> &Arc<dyn StorageProvider> {
        &self.provider
    }

    /// Read-only view of the whole store
    pub fn data(&self) -> &Store {
        &self.data
    }

    /// Deep copy of the value at a dotted path
    pub fn get(&self, path: &str) -> Option<Value> {
        let value = self.data.get(path);
        debug!("[{}] get '{}' -> {}", self.id, path, describe(&value));
        value
    }

    /// Like [`Config::get`], accepting a leading `.` and `"."` for the root
    pub fn query(&self, path: &str) -> Option<Value> {
        let value = self.data.query(path);
        debug!("[{}] query '{}' -> {}", self.id, path, describe(&value));
        value
    }

    /// Set a value at a dotted path and mark the path dirty
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        debug!("[{}] set '{}' <- {}", self.id, path, value.type_name());
        self.data.set(path, value);
        self.mark_dirty(path);
        true
    }

    /// Delete the value at a dotted path; the path is marked dirty only when
    /// something was removed
    pub fn delete(&mut self, path: &str) -> bool {
        let removed = self.data.delete(path);
        debug!("[{}] delete '{}' -> {}", self.id, path, removed);
        if removed {
            self.mark_dirty(path);
        }
        removed
    }

    /// Number of distinct keys changed since the last save
    pub fn dirty(&self) -> usize {
        self.dirty.len()
    }

    pub fn dirty_keys(&self) -> &[String] {
        &self.dirty
    }

    /// Replace the dirty list; duplicates are collapsed
    pub fn set_dirty_keys(&mut self, keys: Vec<String>) {
        self.dirty.clear();
        for key in keys {
            self.mark_dirty(&key);
        }
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    fn mark_dirty(&mut self, key: &str) {
        if !self.dirty.iter().any(|k| k == key) {
            self.dirty.push(key.to_string());
        }
    }

    /// Per-user directory for this config's name
    pub fn default_dir(&self) -> Result<PathBuf> {
        utils::default_dir(&self.name)
    }

    /// Path used when no explicit file is given: `<dir>/config.ini`, with
    /// `dir` falling back to [`Config::default_dir`]
    pub fn config_path(&self) -> Result<PathBuf> {
        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => self.default_dir()?,
        };
        Ok(dir.join(CONFIG_FILE_NAME))
    }

    fn target_path(&self, file: Option<&Path>) -> Result<PathBuf> {
        match file {
            Some(file) => Ok(file.to_path_buf()),
            None => self.config_path(),
        }
    }

    /// Write the store to `file` (or [`Config::config_path`]) and reset the
    /// dirty list. The format follows the file extension.
    pub fn save_sync(&mut self, file: Option<&Path>) -> Result<bool> {
        let path = self.target_path(file)?;
        let format = ConfigFormat::require(&path)?;
        let text = format.serialize(&self.data)?;

        write_file(self.provider.as_ref(), &path, &text)?;

        debug!("[{}] saved {} keys to {} as {}", self.id, self.data.len(), path.display(), format);
        self.clear_dirty();
        Ok(true)
    }

    /// Async form of [`Config::save_sync`]; the write runs on the blocking
    /// thread pool
    pub async fn save(&mut self, file: Option<&Path>) -> Result<bool> {
        let path = self.target_path(file)?;
        let format = ConfigFormat::require(&path)?;
        let text = format.serialize(&self.data)?;

        let provider = Arc::clone(&self.provider);
        let target = path.clone();
        tokio::task::spawn_blocking(move || write_file(provider.as_ref(), &target, &text))
            .await
            .map_err(|e| join_error("save", &path, e))??;

        debug!("[{}] saved {} keys to {} as {}", self.id, self.data.len(), path.display(), format);
        self.clear_dirty();
        Ok(true)
    }

    /// Load the config called `name` from `file` (or its default path).
    ///
    /// A missing file is an error unless `ignore_not_found` is set, in which
    /// case the config starts empty.
    pub fn load_sync(name: &str, file: Option<&Path>, ignore_not_found: bool) -> Result<Self> {
        let mut config = Self::new(name)?;
        let path = config.target_path(file)?;
        let format = ConfigFormat::require(&path)?;

        let read = config.provider.read_to_string(&path);
        config.data = finish_load(&config, &path, format, read, ignore_not_found)?;
        Ok(config)
    }

    /// Async form of [`Config::load_sync`]
    pub async fn load(name: &str, file: Option<&Path>, ignore_not_found: bool) -> Result<Self> {
        let mut config = Self::new(name)?;
        let path = config.target_path(file)?;
        let format = ConfigFormat::require(&path)?;

        let provider = Arc::clone(&config.provider);
        let source = path.clone();
        let read = tokio::task::spawn_blocking(move || provider.read_to_string(&source))
            .await
            .map_err(|e| join_error("load", &path, e))?;
        config.data = finish_load(&config, &path, format, read, ignore_not_found)?;
        Ok(config)
    }
}

fn write_file(provider: &dyn StorageProvider, path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !provider.is_dir(parent) {
            provider.create_dir_all(parent)?;
        }
    }
    provider.write_string(path, text)
}

fn finish_load(
    config: &Config,
    path: &Path,
    format: ConfigFormat,
    read: Result<String>,
    ignore_not_found: bool,
) -> Result<Store> {
    match read {
        Ok(text) => {
            let store = format.deserialize(&text)?;
            debug!("[{}] loaded {} keys from {}", config.id, store.len(), path.display());
            Ok(store)
        }
        Err(e) if ignore_not_found && e.is_not_found() => {
            warn!("[{}] {} not found, starting empty", config.id, path.display());
            Ok(Store::new())
        }
        Err(e) => Err(e),
    }
}

fn join_error(operation: &str, path: &Path, e: tokio::task::JoinError) -> Error {
    StorageSystemError::OperationFailed {
        operation: operation.to_string(),
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    }
    .into()
}

fn describe(value: &Option<Value>) -> &'static str {
    value.as_ref().map(Value::type_name).unwrap_or("<missing>")
}
