#![cfg(test)]

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::tempdir;

use crate::error::{Error, Result};
use crate::storage::config::{Config, ConfigOptions};
use crate::storage::provider::StorageProvider;
use crate::store::Store;
use crate::value::Value;

/// Provider that keeps files in memory and counts writes
#[derive(Debug, Default)]
struct MemoryStorageProvider {
    files: Mutex<HashMap<PathBuf, String>>,
    dirs: Mutex<Vec<PathBuf>>,
}

impl MemoryStorageProvider {
    fn file(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

impl StorageProvider for MemoryStorageProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().iter().any(|d| d == path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.dirs.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.file(path).ok_or_else(|| {
            Error::io(
                io::Error::from(io::ErrorKind::NotFound),
                "read_to_string",
                path.to_path_buf(),
            )
        })
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }
}

#[test]
fn test_new_config_is_empty_and_clean() -> Result<()> {
    let config = Config::new("myapp")?;
    assert_eq!(config.name(), "myapp");
    assert!(config.id().starts_with("mycfg_"));
    assert!(config.data().is_empty());
    assert_eq!(config.dirty(), 0);
    assert!(config.dir().is_none());
    Ok(())
}

#[test]
fn test_config_name_validation() {
    for name in ["", "my.app", "a/b", "a\\b"] {
        let result = Config::new(name);
        assert!(
            matches!(result, Err(Error::InvalidArgument(_))),
            "name {:?} should be rejected",
            name
        );
    }
}

#[test]
fn test_with_data_copies_the_store() -> Result<()> {
    let mut source = Store::new();
    source.set("a.b", "c");

    let mut config = Config::with_data("myapp", &source)?;
    config.set("a.b", "changed");

    assert_eq!(source.get("a.b"), Some(Value::from("c")));
    assert_eq!(config.get("a.b"), Some(Value::from("changed")));
    Ok(())
}

#[test]
fn test_construction_does_not_mark_dirty() -> Result<()> {
    let mut data = Store::new();
    data.set("x", 1);
    let config = Config::from_options(ConfigOptions {
        name: "myapp".to_string(),
        dir: Some(PathBuf::from("/tmp/somewhere")),
        data: Some(data),
    })?;
    assert_eq!(config.dirty(), 0);
    assert_eq!(config.dir(), Some(Path::new("/tmp/somewhere")));
    Ok(())
}

#[test]
fn test_set_tracks_distinct_dirty_keys() -> Result<()> {
    let mut config = Config::new("myapp")?;
    assert!(config.set("a", 1));
    assert!(config.set("b.c", true));
    assert!(config.set("a", 2));

    assert_eq!(config.dirty(), 2);
    assert_eq!(config.dirty_keys(), ["a".to_string(), "b.c".to_string()]);
    Ok(())
}

#[test]
fn test_delete_marks_dirty_only_on_removal() -> Result<()> {
    let mut config = Config::new("myapp")?;
    config.set("a.b", "x");
    config.clear_dirty();

    assert!(!config.delete("missing"));
    assert!(!config.delete("a.b.c"));
    assert_eq!(config.dirty(), 0);

    assert!(config.delete(".a.b"));
    assert_eq!(config.dirty_keys(), [".a.b".to_string()]);
    assert_eq!(config.get("a"), Some(Value::Map(Store::new())));
    Ok(())
}

#[test]
fn test_set_dirty_keys_and_clear() -> Result<()> {
    let mut config = Config::new("myapp")?;
    config.set_dirty_keys(vec!["x".to_string(), "y".to_string(), "x".to_string()]);
    assert_eq!(config.dirty(), 2);

    config.clear_dirty();
    assert_eq!(config.dirty(), 0);
    Ok(())
}

#[test]
fn test_get_returns_independent_copy() -> Result<()> {
    let mut config = Config::new("myapp")?;
    config.set("a.b", "c");

    let mut copy = config.get("a").and_then(Value::into_map).expect("a is a map");
    copy.set("b", "mutated");

    assert_eq!(config.get("a.b"), Some(Value::from("c")));
    Ok(())
}

#[test]
fn test_query_root_and_leading_dot() -> Result<()> {
    let mut config = Config::new("myapp")?;
    config.set("a.b", "c");

    assert_eq!(config.query(".a.b"), Some(Value::from("c")));
    let root = config.query(".").and_then(Value::into_map).expect("root is a map");
    assert_eq!(&root, config.data());
    Ok(())
}

#[test]
fn test_config_path_uses_dir() -> Result<()> {
    let config = Config::from_options(ConfigOptions {
        name: "myapp".to_string(),
        dir: Some(PathBuf::from("/etc/myapp")),
        data: None,
    })?;
    assert_eq!(config.config_path()?, PathBuf::from("/etc/myapp/config.ini"));
    Ok(())
}

#[test]
fn test_config_path_defaults_to_user_dir() -> Result<()> {
    let config = Config::new("myapp")?;
    let Some(home) = dirs::home_dir() else {
        return Ok(());
    };
    let expected = if cfg!(windows) {
        home.join("AppData").join("Local").join("myapp")
    } else {
        home.join(".config").join("myapp")
    };
    assert_eq!(config.default_dir()?, expected);
    assert_eq!(config.config_path()?, expected.join("config.ini"));
    Ok(())
}

#[test]
fn test_save_and_load_ini() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let file = temp_dir.path().join("nested").join("app.ini");

    let mut config = Config::new("myapp")?;
    config.set("name", "value");
    config.set("section.key1", "value1");
    assert_eq!(config.dirty(), 2);

    assert!(config.save_sync(Some(&file))?);
    assert_eq!(config.dirty(), 0);

    let text = fs::read_to_string(&file)?;
    assert!(text.starts_with("name=value"));
    assert!(text.contains("[section]"));

    let loaded = Config::load_sync("myapp", Some(&file), false)?;
    assert_eq!(loaded.data(), config.data());
    assert_eq!(loaded.dirty(), 0);
    Ok(())
}

#[test]
fn test_save_and_load_json() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let file = temp_dir.path().join("app.json");

    let mut config = Config::new("myapp")?;
    config.set("port", 8080);
    config.set("hosts", vec!["a", "b"]);
    config.save_sync(Some(&file))?;

    assert_eq!(fs::read_to_string(&file)?, r#"{"port":8080,"hosts":["a","b"]}"#);

    let loaded = Config::load_sync("myapp", Some(&file), false)?;
    assert_eq!(loaded.get("port"), Some(Value::from(8080)));
    Ok(())
}

#[test]
fn test_save_to_configured_dir() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let dir = temp_dir.path().join("myapp");

    let mut config = Config::from_options(ConfigOptions {
        name: "myapp".to_string(),
        dir: Some(dir.clone()),
        data: None,
    })?;
    config.save_sync(None)?;

    // empty store writes an empty file
    assert_eq!(fs::read_to_string(dir.join("config.ini"))?, "");
    Ok(())
}

#[test]
fn test_save_unsupported_extension_writes_nothing() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let file = temp_dir.path().join("sub").join("app.yaml");

    let mut config = Config::new("myapp")?;
    config.set("a", 1);

    let err = config.save_sync(Some(&file)).expect_err("yaml is not supported");
    assert!(err.is_unsupported_format());
    assert!(!file.exists());
    assert!(!temp_dir.path().join("sub").exists());
    assert_eq!(config.dirty(), 1);
    Ok(())
}

#[test]
fn test_load_missing_file() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let file = temp_dir.path().join("missing.ini");

    let err = Config::load_sync("myapp", Some(&file), false).expect_err("file is missing");
    assert!(err.is_not_found());

    let config = Config::load_sync("myapp", Some(&file), true)?;
    assert!(config.data().is_empty());
    Ok(())
}

#[test]
fn test_load_rejects_bad_name_and_bad_json() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let file = temp_dir.path().join("bad.json");
    fs::write(&file, "[1, 2, 3]")?;

    assert!(matches!(
        Config::load_sync("bad.name", Some(&file), true),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        Config::load_sync("myapp", Some(&file), true),
        Err(Error::ParseFailure { .. })
    ));
    Ok(())
}

#[test]
fn test_save_through_custom_provider() -> Result<()> {
    let provider = Arc::new(MemoryStorageProvider::default());
    let mut config = Config::new("myapp")?.with_provider(provider.clone());
    config.set("k", "v");

    config.save_sync(Some(Path::new("mem/app.ini")))?;

    let expected = if cfg!(windows) { "k=v\r\n" } else { "k=v\n" };
    assert_eq!(provider.file(Path::new("mem/app.ini")).as_deref(), Some(expected));
    assert!(provider.is_dir(Path::new("mem")));
    assert_eq!(config.provider().name(), "memory");
    Ok(())
}

#[tokio::test]
async fn test_async_save_and_load() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let file = temp_dir.path().join("async").join("config.ini");

    let mut config = Config::new("myapp")?;
    config.set("server.host", "localhost");
    config.set("server.tls", false);

    assert!(config.save(Some(&file)).await?);
    assert_eq!(config.dirty(), 0);

    let loaded = Config::load("myapp", Some(&file), false).await?;
    assert_eq!(loaded.get("server.host"), Some(Value::from("localhost")));
    assert_eq!(loaded.get("server.tls"), Some(Value::Bool(false)));
    Ok(())
}

#[tokio::test]
async fn test_async_load_missing_file() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let file = temp_dir.path().join("nothing.json");

    let err = Config::load("myapp", Some(&file), false)
        .await
        .expect_err("file is missing");
    assert!(err.is_not_found());

    let config = Config::load("myapp", Some(&file), true).await?;
    assert!(config.data().is_empty());
    Ok(())
}

#[test]
fn test_async_save_rejects_extension_before_io() {
    let mut config = Config::new("myapp").expect("valid name");
    config.set("a", 1);

    // fails before any blocking task is spawned, so no runtime is needed
    let result = futures::executor::block_on(config.save(Some(Path::new("out.txt"))));
    assert!(result.expect_err("txt is not supported").is_unsupported_format());
}
