// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Movie identifiers and favorite lists.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Positive integer identifying a movie in the metadata catalog.
///
/// Zero is never a valid identifier; every parse boundary rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct MovieId(u64);

/// Rejected movie identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MovieIdError {
    /// No identifier supplied (absent, null, empty or zero).
    #[error("Movie ID is required")]
    Missing,
    /// Something was supplied but it is not a positive integer.
    #[error("Movie ID must be a positive integer, got {0}")]
    Invalid(String),
}

impl MovieId {
    /// Wrap a raw identifier. Returns `None` for zero.
    pub fn new(raw: u64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Extract an identifier from a decoded JSON value.
    ///
    /// `None`, `null` and `0` count as missing; anything that is not a
    /// positive integer is invalid.
    pub fn from_json(value: Option<&serde_json::Value>) -> Result<Self, MovieIdError> {
        match value {
            None | Some(serde_json::Value::Null) => Err(MovieIdError::Missing),
            Some(v) => match v.as_u64() {
                Some(0) => Err(MovieIdError::Missing),
                Some(raw) => Ok(Self(raw)),
                None => Err(MovieIdError::Invalid(v.to_string())),
            },
        }
    }
}

impl TryFrom<u64> for MovieId {
    type Error = MovieIdError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(MovieIdError::Missing)
    }
}

impl From<MovieId> for u64 {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl FromStr for MovieId {
    type Err = MovieIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MovieIdError::Missing);
        }
        match trimmed.parse::<u64>() {
            Ok(0) => Err(MovieIdError::Missing),
            Ok(raw) => Ok(Self(raw)),
            Err(_) => Err(MovieIdError::Invalid(trimmed.to_owned())),
        }
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered set of favorite movie identifiers.
///
/// Insertion order is preserved; duplicates are impossible. Building a list
/// from any sequence keeps the first occurrence of each identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<MovieId>", into = "Vec<MovieId>")]
pub struct FavoriteList(Vec<MovieId>);

impl FavoriteList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` unless already present. Returns `true` when the list changed.
    pub fn insert(&mut self, id: MovieId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Drop `id` if present. Returns `true` when the list changed.
    pub fn remove(&mut self, id: MovieId) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| *existing != id);
        self.0.len() != before
    }

    /// Membership test.
    pub fn contains(&self, id: MovieId) -> bool {
        self.0.contains(&id)
    }

    /// Number of favorites.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when there are no favorites.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, MovieId> {
        self.0.iter()
    }

    /// Borrow the identifiers in insertion order.
    pub fn as_slice(&self) -> &[MovieId] {
        &self.0
    }
}

impl FromIterator<MovieId> for FavoriteList {
    fn from_iter<I: IntoIterator<Item = MovieId>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        Self(iter.into_iter().filter(|id| seen.insert(*id)).collect())
    }
}

impl From<Vec<MovieId>> for FavoriteList {
    fn from(ids: Vec<MovieId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<FavoriteList> for Vec<MovieId> {
    fn from(list: FavoriteList) -> Self {
        list.0
    }
}

impl<'a> IntoIterator for &'a FavoriteList {
    type Item = &'a MovieId;
    type IntoIter = std::slice::Iter<'a, MovieId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Successful favorites response (`GET`, `POST` and `DELETE`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesBody {
    /// Human readable outcome (mutations only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Authoritative list after the operation.
    #[serde(default)]
    pub favorites: FavoriteList,
}

/// Body of `POST /api/favorites`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddFavoriteRequest {
    /// Movie to add.
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
}

impl AddFavoriteRequest {
    /// Decode a raw request body, reporting a missing or malformed `movieId`.
    pub fn parse(body: &[u8]) -> Result<Self, MovieIdError> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|_| MovieIdError::Missing)?;
        let movie_id = MovieId::from_json(value.get("movieId"))?;
        Ok(Self { movie_id })
    }
}
