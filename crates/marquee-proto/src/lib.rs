// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire schema for the Marquee favorites service.
//!
//! Shared by the HTTP service (`marquee-service`), the HTTP clients
//! (`marquee-client`) and the client-side adapter (`marquee-app-core`), so the
//! JSON shapes on both sides of the wire cannot drift.

mod auth;
mod favorites;
mod identity;

pub use auth::{ErrorBody, PublicUser, RegisterRequest, RegisterResponse};
pub use favorites::{AddFavoriteRequest, FavoriteList, FavoritesBody, MovieId, MovieIdError};
pub use identity::UserIdentity;

/// Header carrying the externally-issued user identity.
///
/// The identity provider (session layer or reverse proxy) sets this header;
/// the service treats its value as an opaque key.
pub const IDENTITY_HEADER: &str = "x-marquee-identity";

/// Route for the favorites collection (GET / POST / DELETE).
pub const FAVORITES_PATH: &str = "/api/favorites";

/// Route for account registration.
pub const REGISTER_PATH: &str = "/api/auth/register";

/// Liveness probe route.
pub const HEALTH_PATH: &str = "/healthz";

/// Default listen address of the service.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8797";

/// Default base URL clients use to reach the service.
///
/// Honors `MARQUEE_SERVER` when set and falls back to [`DEFAULT_LISTEN`].
pub fn default_server_url() -> String {
    std::env::var("MARQUEE_SERVER")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| format!("http://{DEFAULT_LISTEN}"))
}
