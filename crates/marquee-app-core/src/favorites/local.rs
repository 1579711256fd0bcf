// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Device-local favorites entry on top of a `ConfigStore`.

use marquee_proto::FavoriteList;
use tracing::debug;

use crate::config::{ConfigService, ConfigStore};

use super::FavoritesError;

/// Fixed key holding the local favorites list.
pub const FAVORITES_KEY: &str = "favorites";

/// Local fallback store: one JSON array of movie ids under [`FAVORITES_KEY`].
pub struct LocalFavorites<S> {
    config: ConfigService<S>,
}

impl<S> LocalFavorites<S> {
    /// Wrap a config store.
    pub fn new(store: S) -> Self {
        Self {
            config: ConfigService::new(store),
        }
    }
}

impl<S> LocalFavorites<S>
where
    S: ConfigStore,
{
    /// Read the stored list. Absent or unparsable entries read as empty.
    pub fn read(&self) -> FavoriteList {
        match self.config.load::<FavoriteList>(FAVORITES_KEY) {
            Ok(Some(list)) => list,
            Ok(None) => FavoriteList::new(),
            Err(err) => {
                debug!(%err, "local favorites unreadable; treating as empty");
                FavoriteList::new()
            }
        }
    }

    /// Overwrite the stored list.
    pub fn write(&self, list: &FavoriteList) -> Result<(), FavoritesError> {
        self.config
            .save(FAVORITES_KEY, list)
            .map_err(FavoritesError::Persistence)
    }
}
