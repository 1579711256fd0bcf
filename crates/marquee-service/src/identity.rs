// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Extractor for the externally-issued identity header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use marquee_proto::{UserIdentity, IDENTITY_HEADER};

use crate::error::ApiError;

/// Authenticated caller. Rejects with `401` when the header is missing, blank
/// or not UTF-8.
///
/// The value is opaque: any UTF-8 text the account was registered with is
/// accepted, including non-ASCII emails.
#[derive(Debug, Clone)]
pub struct Identity(pub UserIdentity);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(IDENTITY_HEADER)
            .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
            .and_then(UserIdentity::parse)
            .map(Self)
            .ok_or(ApiError::Unauthenticated)
    }
}
