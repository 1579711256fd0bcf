// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HTTP clients for Marquee front ends.
//!
//! - [`HttpFavorites`]: the remote favorites backend plugged into
//!   [`marquee_app_core::favorites::FavoritesStore`].
//! - [`register`]: account creation against the service.
//! - [`tmdb::TmdbClient`]: read-only movie metadata.

pub mod tmdb;

use std::time::Duration;

use async_trait::async_trait;
use marquee_app_core::favorites::{FavoritesError, RemoteFavorites};
use marquee_proto::{
    AddFavoriteRequest, ErrorBody, FavoriteList, FavoritesBody, MovieId, RegisterRequest,
    RegisterResponse, UserIdentity, FAVORITES_PATH, IDENTITY_HEADER, REGISTER_PATH,
};
use reqwest::{Response, StatusCode};
use thiserror::Error;
use tracing::debug;

/// Request timeout used by [`HttpFavorites::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

fn join(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Remote favorites over the service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpFavorites {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpFavorites {
    /// Client for the service at `base_url` with [`DEFAULT_TIMEOUT`].
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Reuse an existing `reqwest` client.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: join(base_url, FAVORITES_PATH),
        }
    }

    /// Full URL of the favorites collection.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Map a favorites response onto the adapter's error taxonomy.
///
/// Only `200 OK` counts as success.
async fn favorites_from(
    resp: Result<Response, reqwest::Error>,
) -> Result<FavoriteList, FavoritesError> {
    let resp = resp.map_err(|err| FavoritesError::Transport(err.to_string()))?;
    match resp.status() {
        StatusCode::OK => resp
            .json::<FavoritesBody>()
            .await
            .map(|body| body.favorites)
            .map_err(|err| FavoritesError::Transport(err.to_string())),
        StatusCode::UNAUTHORIZED => Err(FavoritesError::Unauthenticated),
        StatusCode::NOT_FOUND => Err(FavoritesError::NotFound),
        StatusCode::BAD_REQUEST => {
            let message = resp
                .json::<ErrorBody>()
                .await
                .map_or_else(|_| "bad request".to_owned(), |body| body.message);
            Err(FavoritesError::Validation(message))
        }
        other => Err(FavoritesError::UnexpectedStatus(other.as_u16())),
    }
}

#[async_trait]
impl RemoteFavorites for HttpFavorites {
    async fn get(&self, identity: &UserIdentity) -> Result<FavoriteList, FavoritesError> {
        debug!(endpoint = %self.endpoint, "fetching remote favorites");
        favorites_from(
            self.http
                .get(&self.endpoint)
                .header(IDENTITY_HEADER, identity.as_str())
                .send()
                .await,
        )
        .await
    }

    async fn add(
        &self,
        identity: &UserIdentity,
        movie_id: MovieId,
    ) -> Result<FavoriteList, FavoritesError> {
        favorites_from(
            self.http
                .post(&self.endpoint)
                .header(IDENTITY_HEADER, identity.as_str())
                .json(&AddFavoriteRequest { movie_id })
                .send()
                .await,
        )
        .await
    }

    async fn remove(
        &self,
        identity: &UserIdentity,
        movie_id: MovieId,
    ) -> Result<FavoriteList, FavoritesError> {
        favorites_from(
            self.http
                .delete(&self.endpoint)
                .header(IDENTITY_HEADER, identity.as_str())
                .query(&[("movieId", movie_id.get())])
                .send()
                .await,
        )
        .await
    }
}

/// Registration failures.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The request never got an answer.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service refused the registration.
    #[error("registration rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Reason reported by the service.
        message: String,
    },
}

/// Create an account on the service at `base_url`.
pub async fn register(
    http: &reqwest::Client,
    base_url: &str,
    req: &RegisterRequest,
) -> Result<RegisterResponse, RegisterError> {
    let resp = http.post(join(base_url, REGISTER_PATH)).json(req).send().await?;
    let status = resp.status();
    if status == StatusCode::CREATED {
        return Ok(resp.json().await?);
    }
    let message = resp
        .json::<ErrorBody>()
        .await
        .map_or_else(|_| status.to_string(), |body| body.message);
    Err(RegisterError::Rejected {
        status: status.as_u16(),
        message,
    })
}
