// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Account registration.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use marquee_app_core::config::ConfigStore;
use marquee_proto::{RegisterRequest, RegisterResponse};
use tracing::{error, info};

use crate::error::ApiError;
use crate::users::{DirectoryError, UserRecord};
use crate::AppState;

pub(crate) async fn register<S>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
{
    let req: RegisterRequest = serde_json::from_slice(&body).unwrap_or_default();
    if !req.is_complete() {
        return Err(ApiError::Validation(
            "Name, email, and password are required".into(),
        ));
    }
    let email = req.email.trim().to_owned();
    let lookup = email.clone();
    let existing = state
        .directory(move |users| users.find(&lookup))
        .await
        .map_err(ApiError::storage("Error performing database operation"))?;
    if existing.is_some() {
        return Err(ApiError::UserExists);
    }

    let cost = state.hash_cost;
    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|err| {
            error!(?err, "password hashing task failed");
            ApiError::Internal("Error creating user")
        })?
        .map_err(|err| {
            error!(%err, "password hashing failed");
            ApiError::Internal("Error creating user")
        })?;

    let record = UserRecord::new(req.name.trim(), email, password_hash);
    let stored = record.clone();
    match state.directory(move |users| users.insert(stored)).await {
        Ok(()) => {}
        Err(DirectoryError::Conflict) => return Err(ApiError::UserExists),
        Err(err) => return Err(ApiError::storage("Error performing database operation")(err)),
    }
    info!(email = %record.email, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".into(),
            user: record.to_public(),
        }),
    ))
}
