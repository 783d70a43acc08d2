// SPDX-License-Identifier: MPL-2.0
//! In-memory key-value store.

use super::KeyValueStore;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    items: HashMap<String, String>,
    read_only: bool,
}

/// Key-value store held in memory.
///
/// Clones share the same contents, which lets a test inspect what the
/// collection manager persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one item.
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().items.insert(key.into(), value.into());
        store
    }

    /// Makes subsequent writes fail, simulating an unavailable backend.
    pub fn set_read_only(&self, read_only: bool) {
        self.lock().read_only = read_only;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.lock();
        if inner.read_only {
            return Err(Error::Io(format!("store is read-only, cannot write {key}")));
        }
        inner.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
