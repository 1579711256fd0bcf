// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identity status as reported by the external identity collaborator.

use marquee_proto::UserIdentity;

/// Tri-state identity status. The favorites adapter only branches on this.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentityStatus {
    /// The identity provider has not answered yet.
    #[default]
    Resolving,
    /// A user is signed in.
    Present(UserIdentity),
    /// Anonymous session.
    Absent,
}

impl IdentityStatus {
    /// Build a resolved status from an optional raw identity (blank counts as absent).
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(UserIdentity::parse)
            .map_or(Self::Absent, Self::Present)
    }

    /// The signed-in identity, if any.
    pub fn identity(&self) -> Option<&UserIdentity> {
        match self {
            Self::Present(identity) => Some(identity),
            Self::Resolving | Self::Absent => None,
        }
    }

    /// Returns `true` while the provider is still resolving.
    pub fn is_resolving(&self) -> bool {
        matches!(self, Self::Resolving)
    }
}
