#![cfg(test)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use crate::error::Result;
use crate::storage::local::LocalStorageProvider;
use crate::storage::provider::StorageProvider;

fn p(s: &str) -> PathBuf {
    PathBuf::from(s)
}

#[test]
fn test_write_and_read_string() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    provider.write_string(&p("config.ini"), "a=1\n")?;

    assert_eq!(provider.read_to_string(&p("config.ini"))?, "a=1\n");
    assert!(provider.is_file(&p("config.ini")));
    assert_eq!(fs::read_to_string(temp_dir.path().join("config.ini"))?, "a=1\n");
    Ok(())
}

#[test]
fn test_write_creates_parent_directories() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    let nested = p("deep/er/config.json");
    provider.write_string(&nested, "{}")?;

    assert!(provider.is_dir(&p("deep/er")));
    assert_eq!(provider.read_to_string(&nested)?, "{}");
    Ok(())
}

#[test]
fn test_write_replaces_existing_file() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    provider.write_string(&p("f.ini"), "first=1\nwith=more\n")?;
    provider.write_string(&p("f.ini"), "second=2\n")?;

    assert_eq!(provider.read_to_string(&p("f.ini"))?, "second=2\n");
    // no temp files left behind
    let entries: Vec<_> = fs::read_dir(temp_dir.path())?.collect();
    assert_eq!(entries.len(), 1);
    Ok(())
}

#[test]
fn test_remove_file() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    provider.write_string(&p("gone.ini"), "x=1")?;
    assert!(provider.exists(&p("gone.ini")), "File should exist after writing");

    provider.remove_file(&p("gone.ini"))?;
    assert!(!provider.exists(&p("gone.ini")), "File should not exist after removal");
    Ok(())
}

#[test]
fn test_read_missing_file_is_not_found() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    let err = provider
        .read_to_string(&p("missing.ini"))
        .expect_err("reading a missing file should fail");
    assert!(err.is_not_found());
}

#[test]
fn test_absolute_paths_ignore_base_path() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(p("/definitely/not/used"));

    let target = temp_dir.path().join("abs.ini");
    provider.write_string(&target, "k=v\n")?;
    assert_eq!(provider.read_to_string(&target)?, "k=v\n");
    Ok(())
}

#[test]
fn test_provider_name_and_base_path() {
    let provider = LocalStorageProvider::new(p("/base"));
    assert_eq!(provider.name(), "local");
    assert_eq!(provider.base_path(), Path::new("/base"));
    assert_eq!(LocalStorageProvider::default().base_path(), Path::new(""));
}
