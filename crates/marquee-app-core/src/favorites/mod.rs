// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Favorites store adapter.
//!
//! [`FavoritesStore`] owns the in-memory favorites list and decides, per call,
//! whether the remote service or the device-local store is the source of truth.
//!
//! # Backend selection
//!
//! The adapter follows the identity collaborator until a remote call fails:
//!
//! - identity present, route not pinned → [`BackendMode::Remote`];
//! - otherwise → [`BackendMode::Local`].
//!
//! The first remote failure pins the route to local for the rest of the
//! session. Nothing unpins it; a new session (a new `FavoritesStore`) is the
//! only way back to the remote store. The two stores are never reconciled.
//!
//! # Errors
//!
//! Remote failures are absorbed into the route switch and logged. Local
//! persistence failures are logged and otherwise ignored; the in-memory list
//! then stays the only record until the session ends.

mod local;

pub use local::{LocalFavorites, FAVORITES_KEY};

use std::fmt;

use async_trait::async_trait;
use marquee_proto::{FavoriteList, MovieId, UserIdentity};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, ConfigStore};
use crate::identity::IdentityStatus;

/// Which store the adapter currently trusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// Remote favorites service, keyed by the signed-in identity.
    Remote,
    /// Device-local fallback store.
    Local,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Remote => "remote",
            Self::Local => "local",
        })
    }
}

/// Failures reported by favorites backends.
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// No identity reached the service.
    #[error("unauthenticated")]
    Unauthenticated,
    /// The identity has no stored record.
    #[error("no favorites record for this identity")]
    NotFound,
    /// The movie id was missing or invalid.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Network or connection failure.
    #[error("transport failure: {0}")]
    Transport(String),
    /// Any other non-success response.
    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),
    /// The local store could not be read or written.
    #[error("persistence failure: {0}")]
    Persistence(#[from] ConfigError),
}

/// Remote favorites port (get / add / remove keyed by identity).
///
/// Implemented over HTTP by `marquee-client`; tests script it directly.
#[async_trait]
pub trait RemoteFavorites: Send + Sync {
    /// Fetch the identity's list.
    async fn get(&self, identity: &UserIdentity) -> Result<FavoriteList, FavoritesError>;
    /// Add `movie_id`; returns the authoritative list.
    async fn add(
        &self,
        identity: &UserIdentity,
        movie_id: MovieId,
    ) -> Result<FavoriteList, FavoritesError>;
    /// Remove `movie_id`; returns the authoritative list.
    async fn remove(
        &self,
        identity: &UserIdentity,
        movie_id: MovieId,
    ) -> Result<FavoriteList, FavoritesError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    FollowIdentity,
    PinnedLocal,
}

/// Session-scoped favorites adapter.
pub struct FavoritesStore<R, S> {
    remote: R,
    local: LocalFavorites<S>,
    identity: IdentityStatus,
    route: Route,
    favorites: FavoriteList,
    // Store the in-memory list was last taken from; `None` before any read.
    held: Option<BackendMode>,
    loading: bool,
}

impl<R, S> FavoritesStore<R, S>
where
    R: RemoteFavorites,
    S: ConfigStore + Send,
{
    /// Start a session. Nothing is read until [`load`](Self::load).
    pub fn new(remote: R, local: S, identity: IdentityStatus) -> Self {
        Self {
            remote,
            local: LocalFavorites::new(local),
            identity,
            route: Route::FollowIdentity,
            favorites: FavoriteList::new(),
            held: None,
            loading: true,
        }
    }

    /// Replace the identity status (provider resolved, signed in or out).
    ///
    /// Call [`load`](Self::load) afterwards. A pinned-local route stays pinned.
    pub fn set_identity(&mut self, identity: IdentityStatus) {
        self.identity = identity;
    }

    /// Populate the in-memory list from whichever store the mode selects.
    ///
    /// Defers while the identity is resolving (loading stays `true`).
    pub async fn load(&mut self) {
        if self.identity.is_resolving() {
            debug!("identity resolving; deferring favorites load");
            return;
        }
        match self.remote_identity() {
            Some(identity) => match self.remote.get(&identity).await {
                Ok(list) => self.adopt_remote(list),
                Err(err) => self.fall_back("load", &err),
            },
            None => self.read_local(),
        }
        self.loading = false;
    }

    /// Add a movie. Never fails from the caller's point of view.
    ///
    /// A local write always starts from the stored local list, even when no
    /// load has completed yet or the in-memory list came from the remote.
    pub async fn add(&mut self, movie_id: MovieId) {
        if let Some(identity) = self.remote_identity() {
            match self.remote.add(&identity, movie_id).await {
                Ok(list) => {
                    self.adopt_remote(list);
                    return;
                }
                Err(err) => self.fall_back("add", &err),
            }
        }
        if self.local_list().insert(movie_id) {
            self.persist_local();
        }
    }

    /// Remove a movie. Removing an absent id is a no-op.
    ///
    /// Local writes start from the stored local list, as for [`add`](Self::add).
    pub async fn remove(&mut self, movie_id: MovieId) {
        if let Some(identity) = self.remote_identity() {
            match self.remote.remove(&identity, movie_id).await {
                Ok(list) => {
                    self.adopt_remote(list);
                    return;
                }
                Err(err) => self.fall_back("remove", &err),
            }
        }
        if self.local_list().remove(movie_id) {
            self.persist_local();
        }
    }

    /// Flip membership of `movie_id`. Returns whether it is a favorite afterwards.
    pub async fn toggle(&mut self, movie_id: MovieId) -> bool {
        if self.is_favorite(movie_id) {
            self.remove(movie_id).await;
        } else {
            self.add(movie_id).await;
        }
        self.is_favorite(movie_id)
    }

    /// Membership test against the in-memory list. Never does I/O.
    pub fn is_favorite(&self, movie_id: MovieId) -> bool {
        self.favorites.contains(movie_id)
    }

    /// Current in-memory list.
    pub fn favorites(&self) -> &FavoriteList {
        &self.favorites
    }

    /// Backend the next call will use.
    pub fn mode(&self) -> BackendMode {
        match (self.route, &self.identity) {
            (Route::FollowIdentity, IdentityStatus::Present(_)) => BackendMode::Remote,
            _ => BackendMode::Local,
        }
    }

    /// `true` until the first completed [`load`](Self::load).
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current identity status.
    pub fn identity(&self) -> &IdentityStatus {
        &self.identity
    }

    fn remote_identity(&self) -> Option<UserIdentity> {
        match self.mode() {
            BackendMode::Remote => self.identity.identity().cloned(),
            BackendMode::Local => None,
        }
    }

    fn fall_back(&mut self, op: &'static str, err: &FavoritesError) {
        warn!(op, %err, "remote favorites failed; using local store for the rest of the session");
        self.route = Route::PinnedLocal;
        self.read_local();
    }

    fn adopt_remote(&mut self, list: FavoriteList) {
        self.favorites = list;
        self.held = Some(BackendMode::Remote);
    }

    fn read_local(&mut self) {
        self.favorites = self.local.read();
        self.held = Some(BackendMode::Local);
    }

    fn local_list(&mut self) -> &mut FavoriteList {
        if self.held != Some(BackendMode::Local) {
            self.read_local();
        }
        &mut self.favorites
    }

    fn persist_local(&self) {
        if let Err(err) = self.local.write(&self.favorites) {
            warn!(%err, "could not persist favorites locally; keeping them in memory only");
        }
    }
}
