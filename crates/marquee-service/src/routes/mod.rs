// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HTTP handlers.

pub(crate) mod auth;
pub(crate) mod favorites;

pub(crate) async fn health() -> &'static str {
    "ok"
}
