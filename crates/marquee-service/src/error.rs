// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! API error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use marquee_proto::ErrorBody;
use thiserror::Error;
use tracing::error;

use crate::users::DirectoryError;

/// Failures surfaced to HTTP callers as `{"message": ...}` bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or blank identity header.
    #[error("Unauthorized")]
    Unauthenticated,
    /// The identity has no account record.
    #[error("User not found")]
    UserNotFound,
    /// Malformed or incomplete input.
    #[error("{0}")]
    Validation(String),
    /// Registration for an email that is already taken.
    #[error("User already exists")]
    UserExists,
    /// The user directory failed; `message` is what the caller sees.
    #[error("{message}")]
    Storage {
        /// Caller-facing summary.
        message: &'static str,
        /// Underlying directory failure (logged, never sent).
        #[source]
        source: DirectoryError,
    },
    /// Any other server-side failure.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Wrap a directory failure with a caller-facing summary.
    pub fn storage(message: &'static str) -> impl FnOnce(DirectoryError) -> Self {
        move |source| Self::Storage { message, source }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::UserExists => StatusCode::BAD_REQUEST,
            Self::Storage { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Storage { message, source } = &self {
            error!(%source, "{message}");
        }
        let body = ErrorBody {
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
