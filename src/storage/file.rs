// SPDX-License-Identifier: MPL-2.0
//! File-backed key-value store.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go to a sibling temp file that
//! is renamed over the target, so readers never observe a half-written
//! document.

use super::KeyValueStore;
use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

const FILE_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = "tmp";

/// Key-value store persisting one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the path of the document backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{FILE_EXTENSION}"))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(format!("Failed to read {:?}: {}", path, e))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Io(format!("Failed to create directory {:?}: {}", self.dir, e))
        })?;

        let path = self.path_for(key);
        let temp_path = path.with_extension(format!("{FILE_EXTENSION}.{TEMP_SUFFIX}"));

        fs::write(&temp_path, value)
            .map_err(|e| Error::Io(format!("Failed to write {:?}: {}", temp_path, e)))?;
        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            Error::Io(format!("Failed to replace {:?}: {}", path, e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_key_reads_as_none() {
        let temp_dir = tempdir().expect("create temp dir");
        let store = FileStore::new(temp_dir.path());
        assert_eq!(store.get_item("stories").expect("read"), None);
    }

    #[test]
    fn set_then_get_returns_value() {
        let temp_dir = tempdir().expect("create temp dir");
        let store = FileStore::new(temp_dir.path());

        store.set_item("stories", "[]").expect("write");

        assert_eq!(store.get_item("stories").expect("read"), Some("[]".into()));
        assert!(store.path_for("stories").exists());
    }

    #[test]
    fn set_item_creates_nested_directories() {
        let temp_dir = tempdir().expect("create temp dir");
        let nested = temp_dir.path().join("deep").join("data");
        let store = FileStore::new(&nested);

        store.set_item("stories", "[]").expect("write");

        assert!(nested.join("stories.json").exists());
    }

    #[test]
    fn set_item_leaves_no_temp_file_behind() {
        let temp_dir = tempdir().expect("create temp dir");
        let store = FileStore::new(temp_dir.path());

        store.set_item("stories", "[1]").expect("first write");
        store.set_item("stories", "[2]").expect("second write");

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .expect("list dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["stories.json".to_string()]);
        assert_eq!(store.get_item("stories").expect("read"), Some("[2]".into()));
    }

    #[test]
    fn keys_are_isolated() {
        let temp_dir = tempdir().expect("create temp dir");
        let store = FileStore::new(temp_dir.path());

        store.set_item("a", "first").expect("write a");
        store.set_item("b", "second").expect("write b");

        assert_eq!(store.get_item("a").expect("read a"), Some("first".into()));
        assert_eq!(store.get_item("b").expect("read b"), Some("second".into()));
    }
}
