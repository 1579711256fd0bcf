// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! User directory: account records plus their server-side favorites.
//!
//! All records live under one config key as a JSON object keyed by email.
//! Every read-modify-write runs under a single mutex, so concurrent requests
//! for the same account cannot lose updates.
//!
//! Calls block on the store; async handlers reach the directory through
//! [`crate::AppState::directory`], which runs them on the blocking pool.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use marquee_app_core::config::{ConfigError, ConfigService, ConfigStore};
use marquee_proto::{FavoriteList, MovieId, PublicUser, UserIdentity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config key holding every user record.
pub const USERS_KEY: &str = "users";

/// Stored account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Display name.
    pub name: String,
    /// Unique account email; doubles as the identity key.
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Avatar URL (empty when unset).
    #[serde(default)]
    pub image: String,
    /// Server-side favorites.
    #[serde(default)]
    pub favorites: FavoriteList,
    /// Creation time, seconds since the Unix epoch.
    pub created_at: u64,
}

impl UserRecord {
    /// Fresh account with no favorites, stamped with the current time.
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: String) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        Self {
            name: name.into(),
            email: email.into(),
            password_hash,
            image: String::new(),
            favorites: FavoriteList::new(),
            created_at,
        }
    }

    /// Wire view without the password hash.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            favorites: self.favorites.clone(),
            created_at: self.created_at,
        }
    }
}

/// Directory failures.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// An account with this email already exists.
    #[error("user already exists")]
    Conflict,
    /// The backing store failed.
    #[error("user store unavailable: {0}")]
    Store(#[from] ConfigError),
    /// A previous writer panicked while holding the lock.
    #[error("user store lock poisoned")]
    Poisoned,
    /// The blocking task running the call panicked or was cancelled.
    #[error("user store task failed: {0}")]
    Interrupted(#[from] tokio::task::JoinError),
}

type Users = BTreeMap<String, UserRecord>;

/// Account records persisted through a [`ConfigStore`].
pub struct UserDirectory<S> {
    config: Mutex<ConfigService<S>>,
}

impl<S> UserDirectory<S>
where
    S: ConfigStore,
{
    /// Wrap a config store.
    pub fn new(store: S) -> Self {
        Self {
            config: Mutex::new(ConfigService::new(store)),
        }
    }

    /// Look up an account by email.
    pub fn find(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError> {
        self.with_users(|users| (users.get(email).cloned(), false))
    }

    /// Store a new account. Fails with [`DirectoryError::Conflict`] on a duplicate email.
    pub fn insert(&self, record: UserRecord) -> Result<(), DirectoryError> {
        self.with_users(|users| {
            if users.contains_key(&record.email) {
                return (Err(DirectoryError::Conflict), false);
            }
            users.insert(record.email.clone(), record);
            (Ok(()), true)
        })?
    }

    /// Favorites of `identity`, or `None` when no account matches.
    pub fn favorites(&self, identity: &UserIdentity) -> Result<Option<FavoriteList>, DirectoryError> {
        self.with_users(|users| {
            (
                users.get(identity.as_str()).map(|u| u.favorites.clone()),
                false,
            )
        })
    }

    /// Append `movie_id` to the account's favorites (no-op when present).
    pub fn add_favorite(
        &self,
        identity: &UserIdentity,
        movie_id: MovieId,
    ) -> Result<Option<FavoriteList>, DirectoryError> {
        self.edit_favorites(identity, |list| list.insert(movie_id))
    }

    /// Drop `movie_id` from the account's favorites (no-op when absent).
    pub fn remove_favorite(
        &self,
        identity: &UserIdentity,
        movie_id: MovieId,
    ) -> Result<Option<FavoriteList>, DirectoryError> {
        self.edit_favorites(identity, |list| list.remove(movie_id))
    }

    fn edit_favorites(
        &self,
        identity: &UserIdentity,
        edit: impl FnOnce(&mut FavoriteList) -> bool,
    ) -> Result<Option<FavoriteList>, DirectoryError> {
        self.with_users(|users| match users.get_mut(identity.as_str()) {
            Some(user) => {
                let changed = edit(&mut user.favorites);
                (Some(user.favorites.clone()), changed)
            }
            None => (None, false),
        })
    }

    /// Load all users, run `f`, and persist when `f` reports a change.
    fn with_users<T>(&self, f: impl FnOnce(&mut Users) -> (T, bool)) -> Result<T, DirectoryError> {
        let config = self.config.lock().map_err(|_| DirectoryError::Poisoned)?;
        let mut users: Users = config.load(USERS_KEY)?.unwrap_or_default();
        let (out, changed) = f(&mut users);
        if changed {
            config.save(USERS_KEY, &users)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use marquee_app_core::memory::MemoryConfigStore;

    fn id(raw: u64) -> MovieId {
        MovieId::new(raw).expect("non-zero")
    }

    fn ada() -> UserIdentity {
        UserIdentity::parse("ada@example.com").unwrap()
    }

    fn directory_with_ada() -> (UserDirectory<MemoryConfigStore>, MemoryConfigStore) {
        let store = MemoryConfigStore::new();
        let dir = UserDirectory::new(store.clone());
        dir.insert(UserRecord::new("Ada", "ada@example.com", "hash".into()))
            .unwrap();
        (dir, store)
    }

    #[test]
    fn duplicate_email_conflicts() {
        let (dir, _) = directory_with_ada();
        let err = dir
            .insert(UserRecord::new("Other", "ada@example.com", "x".into()))
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Conflict));
        assert_eq!(dir.find("ada@example.com").unwrap().unwrap().name, "Ada");
    }

    #[test]
    fn unknown_identity_has_no_favorites() {
        let (dir, _) = directory_with_ada();
        let bob = UserIdentity::parse("bob@example.com").unwrap();
        assert_eq!(dir.favorites(&bob).unwrap(), None);
        assert_eq!(dir.add_favorite(&bob, id(1)).unwrap(), None);
        assert_eq!(dir.remove_favorite(&bob, id(1)).unwrap(), None);
    }

    #[test]
    fn favorites_are_deduplicated_and_persisted() {
        let (dir, store) = directory_with_ada();
        dir.add_favorite(&ada(), id(12)).unwrap();
        dir.add_favorite(&ada(), id(98)).unwrap();
        let list = dir.add_favorite(&ada(), id(12)).unwrap().unwrap();
        assert_eq!(list.as_slice(), &[id(12), id(98)]);

        let reopened = UserDirectory::new(store);
        assert_eq!(reopened.favorites(&ada()).unwrap(), Some(list));
    }

    #[test]
    fn removing_absent_id_returns_unchanged_list() {
        let (dir, _) = directory_with_ada();
        dir.add_favorite(&ada(), id(5)).unwrap();
        let list = dir.remove_favorite(&ada(), id(6)).unwrap().unwrap();
        assert_eq!(list.as_slice(), &[id(5)]);
        let list = dir.remove_favorite(&ada(), id(5)).unwrap().unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn public_view_drops_password_hash() {
        let record = UserRecord::new("Ada", "ada@example.com", "secret-hash".into());
        let json = serde_json::to_string(&record.to_public()).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
