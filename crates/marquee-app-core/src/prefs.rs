// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved client preferences (service endpoint, identity, metadata API key).

use serde::{Deserialize, Serialize};

/// Config key the client preferences are stored under.
pub const CLIENT_PREFS_KEY: &str = "client";

/// Preferences for a Marquee front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientPrefs {
    /// Base URL of the favorites service.
    pub server_url: String,
    /// Identity issued by the identity provider; `None` browses anonymously.
    pub identity: Option<String>,
    /// TMDB API key. The `TMDB_API_KEY` environment variable takes precedence.
    pub tmdb_api_key: Option<String>,
    /// Override for the TMDB API base URL.
    pub tmdb_base_url: Option<String>,
}

impl Default for ClientPrefs {
    fn default() -> Self {
        Self {
            server_url: marquee_proto::default_server_url(),
            identity: None,
            tmdb_api_key: None,
            tmdb_base_url: None,
        }
    }
}

impl ClientPrefs {
    /// API key to use: environment first, then the saved value.
    pub fn resolved_tmdb_api_key(&self) -> Option<String> {
        std::env::var("TMDB_API_KEY")
            .ok()
            .or_else(|| self.tmdb_api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }
}
