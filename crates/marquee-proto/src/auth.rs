// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Registration payloads and the shared error body.

use serde::{Deserialize, Serialize};

use crate::FavoriteList;

/// Error body returned by every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable reason.
    pub message: String,
}

/// Body of `POST /api/auth/register`.
///
/// Missing fields decode as empty strings so the service can answer with a
/// single validation message instead of a decoder error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Account email (the identity key).
    #[serde(default)]
    pub email: String,
    /// Plain-text password; hashed by the service before storage.
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    /// Returns `true` when every field carries a non-blank value.
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.password]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// Account as exposed over the wire. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Avatar URL (empty when unset).
    #[serde(default)]
    pub image: String,
    /// Server-side favorites.
    #[serde(default)]
    pub favorites: FavoriteList,
    /// Creation time, seconds since the Unix epoch.
    #[serde(rename = "createdAt")]
    pub created_at: u64,
}

/// Successful registration response (`201 Created`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Human readable outcome.
    pub message: String,
    /// The created account.
    pub user: PublicUser,
}
