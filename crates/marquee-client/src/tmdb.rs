// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Read-only TMDB catalog client.
//!
//! Favorites store bare ids; everything shown about a movie comes from here.

use futures_util::future::try_join_all;
use marquee_proto::MovieId;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

/// Production API root.
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
/// Image CDN root; the size segment and poster path are appended.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
/// Returned by [`image_url`] when a movie has no artwork.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/500x750?text=No+Image";

/// Rendition requested from the image CDN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSize {
    /// 500px wide poster.
    #[default]
    W500,
    /// Source resolution.
    Original,
}

impl ImageSize {
    fn segment(self) -> &'static str {
        match self {
            Self::W500 => "w500",
            Self::Original => "original",
        }
    }
}

/// CDN URL for `path`, or [`PLACEHOLDER_IMAGE`] when there is none.
pub fn image_url(path: Option<&str>, size: ImageSize) -> String {
    match path {
        Some(path) if !path.is_empty() => format!("{IMAGE_BASE_URL}/{}{path}", size.segment()),
        _ => PLACEHOLDER_IMAGE.to_owned(),
    }
}

/// Catalog entry as listed by search and popularity endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// TMDB id; the value favorites store.
    pub id: MovieId,
    /// Display title.
    pub title: String,
    /// Plot summary.
    #[serde(default)]
    pub overview: String,
    /// Poster path relative to the image CDN.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop path relative to the image CDN.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// `YYYY-MM-DD`, empty when unreleased or unknown.
    #[serde(default)]
    pub release_date: String,
    /// Mean rating out of 10.
    #[serde(default)]
    pub vote_average: f64,
    /// Number of ratings.
    #[serde(default)]
    pub vote_count: u64,
}

impl Movie {
    /// Release year, when the date carries one.
    pub fn year(&self) -> Option<&str> {
        self.release_date.get(..4).filter(|y| !y.is_empty())
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// 1-based page number.
    pub page: u32,
    /// Entries on this page.
    pub results: Vec<T>,
    /// Number of pages available.
    #[serde(default)]
    pub total_pages: u32,
    /// Number of entries across all pages.
    #[serde(default)]
    pub total_results: u64,
}

impl<T> Page<T> {
    /// Following page number, or `None` on the last page.
    pub fn next_page(&self) -> Option<u32> {
        (self.page < self.total_pages).then_some(self.page + 1)
    }
}

/// Movie listing page.
pub type MoviePage = Page<Movie>;

/// Genre tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// TMDB genre id.
    pub id: u64,
    /// Display name.
    pub name: String,
}

/// Full record for a single movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    /// Listing fields.
    #[serde(flatten)]
    pub movie: Movie,
    /// Running time in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Genre tags.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Marketing tagline.
    #[serde(default)]
    pub tagline: Option<String>,
}

impl MovieDetails {
    /// Comma-separated genre names.
    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Billed actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    /// TMDB person id.
    pub id: u64,
    /// Actor name.
    pub name: String,
    /// Role played.
    #[serde(default)]
    pub character: String,
    /// Billing position, 0 first.
    #[serde(default)]
    pub order: u32,
}

/// Production crew member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    /// TMDB person id.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Job title, e.g. `Director`.
    #[serde(default)]
    pub job: String,
    /// Department, e.g. `Directing`.
    #[serde(default)]
    pub department: String,
}

/// Cast and crew of one movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    /// Movie the credits belong to.
    pub id: u64,
    /// Billed cast in billing order.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl Credits {
    /// Names of everyone credited as director.
    pub fn directors(&self) -> impl Iterator<Item = &str> {
        self.crew
            .iter()
            .filter(|c| c.job == "Director")
            .map(|c| c.name.as_str())
    }
}

/// User review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// TMDB review id.
    pub id: String,
    /// Reviewer handle.
    pub author: String,
    /// Review text.
    pub content: String,
    /// Permalink.
    #[serde(default)]
    pub url: String,
}

/// Review listing page.
pub type ReviewPage = Page<Review>;

/// Catalog failures.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// No API key configured; no request was sent.
    #[error("TMDB API key is not configured")]
    MissingApiKey,
    /// The request failed or the body did not decode.
    #[error("TMDB request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// TMDB answered with a non-success status.
    #[error("TMDB returned status {0}")]
    Status(u16),
}

/// TMDB v3 client authenticated by API key.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl TmdbClient {
    /// Client for the production API.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, TMDB_BASE_URL)
    }

    /// Client for an alternate API root (mirrors, tests).
    pub fn with_base_url(api_key: Option<String>, base_url: &str) -> Self {
        if api_key.is_none() {
            error!("TMDB API key is not set; catalog requests will fail");
        }
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
        }
    }

    /// Popular movies, 1-based `page`.
    pub async fn popular(&self, page: u32) -> Result<MoviePage, MetadataError> {
        self.get("/movie/popular", &[("page", page.to_string())])
            .await
    }

    /// Title search, 1-based `page`.
    pub async fn search(&self, query: &str, page: u32) -> Result<MoviePage, MetadataError> {
        self.get(
            "/search/movie",
            &[("query", query.to_owned()), ("page", page.to_string())],
        )
        .await
    }

    /// Full record for one movie.
    pub async fn details(&self, id: MovieId) -> Result<MovieDetails, MetadataError> {
        self.get(&format!("/movie/{id}"), &[]).await
    }

    /// Records for several movies, in the order given. Fails if any lookup fails.
    pub async fn details_many(&self, ids: &[MovieId]) -> Result<Vec<MovieDetails>, MetadataError> {
        try_join_all(ids.iter().map(|id| self.details(*id))).await
    }

    /// Cast and crew.
    pub async fn credits(&self, id: MovieId) -> Result<Credits, MetadataError> {
        self.get(&format!("/movie/{id}/credits"), &[]).await
    }

    /// First page of user reviews.
    pub async fn reviews(&self, id: MovieId) -> Result<ReviewPage, MetadataError> {
        self.get(&format!("/movie/{id}/reviews"), &[]).await
    }

    async fn get<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, MetadataError> {
        let key = self.api_key.as_deref().ok_or(MetadataError::MissingApiKey)?;
        debug!(path, "TMDB request");
        let resp = self
            .http
            .get(format!("{}{path}", self.base_url))
            .query(&[("api_key", key)])
            .query(query)
            .send()
            .await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            error!("TMDB API authentication failed; check the API key");
        }
        if !status.is_success() {
            return Err(MetadataError::Status(status.as_u16()));
        }
        Ok(resp.json().await?)
    }
}
