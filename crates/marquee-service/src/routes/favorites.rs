// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Remote favorites endpoint: get / add / remove for the calling identity.
//!
//! Checks run in a fixed order: identity, then movie id, then the directory.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use marquee_app_core::config::ConfigStore;
use marquee_proto::{AddFavoriteRequest, FavoritesBody, MovieId};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::identity::Identity;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RemoveParams {
    #[serde(rename = "movieId")]
    movie_id: Option<String>,
}

pub(crate) async fn get<S>(
    State(state): State<Arc<AppState<S>>>,
    Identity(identity): Identity,
) -> Result<Json<FavoritesBody>, ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
{
    let favorites = state
        .directory(move |users| users.favorites(&identity))
        .await
        .map_err(ApiError::storage("Error retrieving favorites from database"))?
        .ok_or(ApiError::UserNotFound)?;
    Ok(Json(FavoritesBody {
        message: None,
        favorites,
    }))
}

pub(crate) async fn add<S>(
    State(state): State<Arc<AppState<S>>>,
    Identity(identity): Identity,
    body: Bytes,
) -> Result<Json<FavoritesBody>, ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
{
    let AddFavoriteRequest { movie_id } =
        AddFavoriteRequest::parse(&body).map_err(|err| ApiError::Validation(err.to_string()))?;
    let caller = identity.clone();
    let favorites = state
        .directory(move |users| users.add_favorite(&caller, movie_id))
        .await
        .map_err(ApiError::storage("Error updating favorites in database"))?
        .ok_or(ApiError::UserNotFound)?;
    debug!(%identity, %movie_id, "favorite added");
    Ok(Json(FavoritesBody {
        message: Some("Movie added to favorites".into()),
        favorites,
    }))
}

pub(crate) async fn remove<S>(
    State(state): State<Arc<AppState<S>>>,
    Identity(identity): Identity,
    Query(params): Query<RemoveParams>,
) -> Result<Json<FavoritesBody>, ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
{
    let movie_id: MovieId = params
        .movie_id
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|err: marquee_proto::MovieIdError| ApiError::Validation(err.to_string()))?;
    let caller = identity.clone();
    let favorites = state
        .directory(move |users| users.remove_favorite(&caller, movie_id))
        .await
        .map_err(ApiError::storage("Error updating favorites in database"))?
        .ok_or(ApiError::UserNotFound)?;
    debug!(%identity, %movie_id, "favorite removed");
    Ok(Json(FavoritesBody {
        message: Some("Movie removed from favorites".into()),
        favorites,
    }))
}
