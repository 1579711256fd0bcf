// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Daemon preferences persisted under the `service` config key.

use std::path::PathBuf;

use marquee_app_core::config::{ConfigService, ConfigStore};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::DEFAULT_HASH_COST;

/// Config key holding [`ServicePrefs`].
pub const SERVICE_PREFS_KEY: &str = "service";

/// Saved daemon settings; command-line flags override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicePrefs {
    /// Listen address, `host:port`.
    pub listen: String,
    /// User database directory; `None` uses the platform config dir.
    pub data_dir: Option<PathBuf>,
    /// bcrypt cost for new accounts.
    pub hash_cost: u32,
}

impl Default for ServicePrefs {
    fn default() -> Self {
        Self {
            listen: marquee_proto::DEFAULT_LISTEN.to_owned(),
            data_dir: None,
            hash_cost: DEFAULT_HASH_COST,
        }
    }
}

impl ServicePrefs {
    /// Saved prefs, or defaults.
    ///
    /// Defaults are written back only when the key is absent. An unreadable
    /// entry is left on disk untouched so a hand edit can be repaired.
    pub fn load_or_init<S: ConfigStore>(config: &ConfigService<S>) -> Self {
        match config.load::<Self>(SERVICE_PREFS_KEY) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => {
                let prefs = Self::default();
                if let Err(err) = config.save(SERVICE_PREFS_KEY, &prefs) {
                    warn!(%err, "could not persist service prefs");
                }
                prefs
            }
            Err(err) => {
                warn!(%err, "unreadable service prefs; using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use marquee_app_core::memory::MemoryConfigStore;

    #[test]
    fn absent_prefs_are_initialized() {
        let store = MemoryConfigStore::new();
        let prefs = ServicePrefs::load_or_init(&ConfigService::new(store.clone()));
        assert_eq!(prefs, ServicePrefs::default());
        let saved = ConfigService::new(store).load::<ServicePrefs>(SERVICE_PREFS_KEY);
        assert_eq!(saved.unwrap(), Some(ServicePrefs::default()));
    }

    #[test]
    fn saved_prefs_are_kept() {
        let store = MemoryConfigStore::new();
        store
            .save_raw(SERVICE_PREFS_KEY, br#"{"listen":"0.0.0.0:9000"}"#)
            .unwrap();
        let prefs = ServicePrefs::load_or_init(&ConfigService::new(store.clone()));
        assert_eq!(prefs.listen, "0.0.0.0:9000");
        assert_eq!(prefs.hash_cost, DEFAULT_HASH_COST);
        assert_eq!(
            store.load_raw(SERVICE_PREFS_KEY).unwrap(),
            br#"{"listen":"0.0.0.0:9000"}"#
        );
    }

    #[test]
    fn unreadable_prefs_are_not_overwritten() {
        let store = MemoryConfigStore::new();
        store.save_raw(SERVICE_PREFS_KEY, b"{\"listen\": 80,").unwrap();
        let prefs = ServicePrefs::load_or_init(&ConfigService::new(store.clone()));
        assert_eq!(prefs, ServicePrefs::default());
        assert_eq!(store.load_raw(SERVICE_PREFS_KEY).unwrap(), b"{\"listen\": 80,");
    }
}
