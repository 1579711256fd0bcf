// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory `ConfigStore`.
//!
//! [`MemoryConfigStore`] backs ephemeral sessions (`--ephemeral` service runs,
//! tests). Clones share the same entries, so a test can hand one clone to a
//! component and inspect what it wrote through another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::{ConfigError, ConfigStore};

/// Shared, thread-safe map of config blobs.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    /// Returns `true` if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| ConfigError::Other("memory store poisoned".into()))?;
        entries.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ConfigError::Other("memory store poisoned".into()))?;
        entries.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}
