// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Catalog client against a canned TMDB stand-in.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use marquee_client::tmdb::{MetadataError, TmdbClient};
use marquee_proto::MovieId;
use serde_json::{json, Value};
use tokio::net::TcpListener;

const KEY: &str = "test-key";

type Params = Query<HashMap<String, String>>;

fn authorized(params: &HashMap<String, String>) -> bool {
    params.get("api_key").map(String::as_str) == Some(KEY)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"status_message": "Invalid API key"})),
    )
        .into_response()
}

fn movie(id: u64, title: &str) -> Value {
    json!({"id": id, "title": title, "poster_path": format!("/{id}.jpg"), "release_date": "2001-01-01"})
}

async fn popular(Query(params): Params) -> Response {
    if !authorized(&params) {
        return unauthorized();
    }
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    Json(json!({
        "page": page,
        "results": [movie(550, "Fight Club"), movie(13, "Forrest Gump")],
        "total_pages": 2,
        "total_results": 4
    }))
    .into_response()
}

async fn search(Query(params): Params) -> Response {
    if !authorized(&params) {
        return unauthorized();
    }
    let query = params.get("query").cloned().unwrap_or_default();
    let results: Vec<Value> = [(550, "Fight Club"), (13, "Forrest Gump")]
        .into_iter()
        .filter(|(_, title)| title.to_lowercase().contains(&query.to_lowercase()))
        .map(|(id, title)| movie(id, title))
        .collect();
    Json(json!({"page": 1, "results": results, "total_pages": 1, "total_results": results.len()}))
        .into_response()
}

async fn details(Path(id): Path<u64>, Query(params): Params) -> Response {
    if !authorized(&params) {
        return unauthorized();
    }
    if id != 550 && id != 13 {
        return (StatusCode::NOT_FOUND, Json(json!({"status_message": "not found"}))).into_response();
    }
    let mut body = movie(id, if id == 550 { "Fight Club" } else { "Forrest Gump" });
    body["runtime"] = json!(139);
    body["genres"] = json!([{"id": 18, "name": "Drama"}]);
    Json(body).into_response()
}

async fn credits(Path(id): Path<u64>, Query(params): Params) -> Response {
    if !authorized(&params) {
        return unauthorized();
    }
    Json(json!({
        "id": id,
        "cast": [{"id": 819, "name": "Edward Norton", "character": "The Narrator", "order": 0}],
        "crew": [
            {"id": 7467, "name": "David Fincher", "job": "Director", "department": "Directing"},
            {"id": 7468, "name": "Someone Else", "job": "Editor", "department": "Editing"}
        ]
    }))
    .into_response()
}

async fn reviews(Path(_id): Path<u64>, Query(params): Params) -> Response {
    if !authorized(&params) {
        return unauthorized();
    }
    Json(json!({
        "page": 1,
        "results": [{"id": "r1", "author": "critic", "content": "Great.", "url": "https://example.com/r1"}],
        "total_pages": 1,
        "total_results": 1
    }))
    .into_response()
}

async fn spawn_catalog() -> String {
    let app = Router::new()
        .route("/movie/popular", get(popular))
        .route("/search/movie", get(search))
        .route("/movie/{id}", get(details))
        .route("/movie/{id}/credits", get(credits))
        .route("/movie/{id}/reviews", get(reviews));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn id(raw: u64) -> MovieId {
    MovieId::new(raw).unwrap()
}

#[tokio::test]
async fn popular_pages_forward() {
    let base = spawn_catalog().await;
    let client = TmdbClient::with_base_url(Some(KEY.into()), &base);

    let first = client.popular(1).await.unwrap();
    assert_eq!(first.results.len(), 2);
    assert_eq!(first.next_page(), Some(2));

    let second = client.popular(2).await.unwrap();
    assert_eq!(second.page, 2);
    assert_eq!(second.next_page(), None);
}

#[tokio::test]
async fn search_passes_query() {
    let base = spawn_catalog().await;
    let client = TmdbClient::with_base_url(Some(KEY.into()), &base);
    let page = client.search("forrest", 1).await.unwrap();
    let titles: Vec<_> = page.results.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Forrest Gump"]);
}

#[tokio::test]
async fn details_credits_and_reviews_decode() {
    let base = spawn_catalog().await;
    let client = TmdbClient::with_base_url(Some(KEY.into()), &base);

    let details = client.details(id(550)).await.unwrap();
    assert_eq!(details.movie.title, "Fight Club");
    assert_eq!(details.runtime, Some(139));
    assert_eq!(details.genre_names(), "Drama");

    let credits = client.credits(id(550)).await.unwrap();
    assert_eq!(credits.cast[0].name, "Edward Norton");
    assert_eq!(credits.directors().collect::<Vec<_>>(), vec!["David Fincher"]);

    let reviews = client.reviews(id(550)).await.unwrap();
    assert_eq!(reviews.results[0].author, "critic");
}

#[tokio::test]
async fn details_many_keeps_order_and_fails_as_a_whole() {
    let base = spawn_catalog().await;
    let client = TmdbClient::with_base_url(Some(KEY.into()), &base);

    let many = client.details_many(&[id(13), id(550)]).await.unwrap();
    let ids: Vec<_> = many.iter().map(|d| d.movie.id.get()).collect();
    assert_eq!(ids, vec![13, 550]);

    let err = client.details_many(&[id(550), id(404)]).await.unwrap_err();
    assert!(matches!(err, MetadataError::Status(404)));
}

#[tokio::test]
async fn wrong_key_surfaces_unauthorized_status() {
    let base = spawn_catalog().await;
    let client = TmdbClient::with_base_url(Some("wrong".into()), &base);
    let err = client.popular(1).await.unwrap_err();
    assert!(matches!(err, MetadataError::Status(401)));
}
