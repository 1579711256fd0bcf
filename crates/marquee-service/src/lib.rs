// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Marquee favorites service.
//!
//! Serves the remote favorites endpoint (`/api/favorites`) and account
//! registration (`/api/auth/register`). Identity comes from the
//! [`marquee_proto::IDENTITY_HEADER`] set by the external identity provider.

pub mod error;
pub mod identity;
pub mod prefs;
mod routes;
pub mod users;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use marquee_app_core::config::ConfigStore;
use marquee_proto::{FAVORITES_PATH, HEALTH_PATH, REGISTER_PATH};
use tower_http::trace::TraceLayer;

use crate::users::{DirectoryError, UserDirectory};

/// bcrypt cost used for new accounts.
pub const DEFAULT_HASH_COST: u32 = 10;

/// Shared state handed to every handler.
pub struct AppState<S> {
    /// Account records and their favorites.
    pub users: UserDirectory<S>,
    /// bcrypt cost for new password hashes.
    pub hash_cost: u32,
}

impl<S> AppState<S>
where
    S: ConfigStore,
{
    /// State over `store` with the default hash cost.
    pub fn new(store: S) -> Self {
        Self {
            users: UserDirectory::new(store),
            hash_cost: DEFAULT_HASH_COST,
        }
    }

    /// Override the bcrypt cost.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }
}

impl<S> AppState<S>
where
    S: ConfigStore + Send + Sync + 'static,
{
    /// Run a user-directory call on the blocking pool.
    ///
    /// The directory holds a mutex across store I/O; this keeps that wait off
    /// the async workers.
    pub async fn directory<T, F>(self: &Arc<Self>, call: F) -> Result<T, DirectoryError>
    where
        T: Send + 'static,
        F: FnOnce(&UserDirectory<S>) -> Result<T, DirectoryError> + Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || call(&state.users)).await?
    }
}

/// Build the service router.
pub fn router<S>(state: Arc<AppState<S>>) -> Router
where
    S: ConfigStore + Send + Sync + 'static,
{
    Router::new()
        .route(
            FAVORITES_PATH,
            get(routes::favorites::get::<S>)
                .post(routes::favorites::add::<S>)
                .delete(routes::favorites::remove::<S>),
        )
        .route(REGISTER_PATH, post(routes::auth::register::<S>))
        .route(HEALTH_PATH, get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
