// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HTTP contract tests for the favorites and registration routes.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::Arc;

use marquee_app_core::memory::MemoryConfigStore;
use marquee_config_fs::FsConfigStore;
use marquee_proto::{
    ErrorBody, FavoritesBody, RegisterResponse, FAVORITES_PATH, IDENTITY_HEADER, REGISTER_PATH,
};
use marquee_service::{router, AppState};
use reqwest::StatusCode;
use serde_json::json;
use tokio::net::TcpListener;

const ADA: &str = "ada@example.com";

async fn spawn_with<S>(store: S) -> SocketAddr
where
    S: marquee_app_core::config::ConfigStore + Send + Sync + 'static,
{
    let state = Arc::new(AppState::new(store).with_hash_cost(4));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    addr
}

async fn spawn() -> SocketAddr {
    spawn_with(MemoryConfigStore::new()).await
}

fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}

async fn register(client: &reqwest::Client, addr: SocketAddr, email: &str) -> reqwest::Response {
    client
        .post(url(addr, REGISTER_PATH))
        .json(&json!({"name": "Ada", "email": email, "password": "hunter2"}))
        .send()
        .await
        .unwrap()
}

async fn message(resp: reqwest::Response) -> String {
    resp.json::<ErrorBody>().await.unwrap().message
}

fn ids(body: &FavoritesBody) -> Vec<u64> {
    body.favorites.iter().map(|id| id.get()).collect()
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let addr = spawn().await;
    let client = reqwest::Client::new();

    let resp = client.get(url(addr, FAVORITES_PATH)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(message(resp).await, "Unauthorized");

    // Identity is checked before the movie id.
    let resp = client
        .post(url(addr, FAVORITES_PATH))
        .header(IDENTITY_HEADER, "  ")
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_identity_is_not_found() {
    let addr = spawn().await;
    let client = reqwest::Client::new();
    let resp = client
        .get(url(addr, FAVORITES_PATH))
        .header(IDENTITY_HEADER, "nobody@example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(message(resp).await, "User not found");

    let resp = client
        .delete(url(addr, FAVORITES_PATH))
        .query(&[("movieId", "5")])
        .header(IDENTITY_HEADER, "nobody@example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn add_and_remove_are_idempotent() {
    let addr = spawn().await;
    let client = reqwest::Client::new();
    assert_eq!(register(&client, addr, ADA).await.status(), StatusCode::CREATED);

    let empty: FavoritesBody = client
        .get(url(addr, FAVORITES_PATH))
        .header(IDENTITY_HEADER, ADA)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(empty.favorites.is_empty());

    let mut last = FavoritesBody::default();
    for movie in [12, 98, 12] {
        let resp = client
            .post(url(addr, FAVORITES_PATH))
            .header(IDENTITY_HEADER, ADA)
            .json(&json!({"movieId": movie}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        last = resp.json().await.unwrap();
    }
    assert_eq!(ids(&last), vec![12, 98]);
    assert_eq!(last.message.as_deref(), Some("Movie added to favorites"));

    for movie in ["5", "12"] {
        let resp = client
            .delete(url(addr, FAVORITES_PATH))
            .query(&[("movieId", movie)])
            .header(IDENTITY_HEADER, ADA)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        last = resp.json().await.unwrap();
    }
    assert_eq!(ids(&last), vec![98]);
    assert_eq!(last.message.as_deref(), Some("Movie removed from favorites"));
}

#[tokio::test]
async fn invalid_movie_ids_are_rejected() {
    let addr = spawn().await;
    let client = reqwest::Client::new();
    register(&client, addr, ADA).await;

    for body in [json!({}), json!({"movieId": 0}), json!({"movieId": "abc"})] {
        let resp = client
            .post(url(addr, FAVORITES_PATH))
            .header(IDENTITY_HEADER, ADA)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {body}");
    }

    let resp = client
        .delete(url(addr, FAVORITES_PATH))
        .header(IDENTITY_HEADER, ADA)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(resp).await, "Movie ID is required");

    // Validation happens before the account lookup.
    let resp = client
        .delete(url(addr, FAVORITES_PATH))
        .query(&[("movieId", "nope")])
        .header(IDENTITY_HEADER, "nobody@example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registration_validates_and_rejects_duplicates() {
    let addr = spawn().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(url(addr, REGISTER_PATH))
        .json(&json!({"name": "Ada", "email": ADA}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(resp).await, "Name, email, and password are required");

    let resp = register(&client, addr, ADA).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let raw: serde_json::Value = resp.json().await.unwrap();
    assert!(raw["user"].get("password").is_none());
    assert!(raw["user"].get("password_hash").is_none());
    let created: RegisterResponse = serde_json::from_value(raw).unwrap();
    assert_eq!(created.user.email, ADA);
    assert!(created.user.favorites.is_empty());

    let resp = register(&client, addr, ADA).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(resp).await, "User already exists");
}

#[tokio::test]
async fn accounts_persist_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let client = reqwest::Client::new();

    let addr = spawn_with(FsConfigStore::at(dir.path()).unwrap()).await;
    register(&client, addr, ADA).await;
    client
        .post(url(addr, FAVORITES_PATH))
        .header(IDENTITY_HEADER, ADA)
        .json(&json!({"movieId": 550}))
        .send()
        .await
        .unwrap();

    let addr = spawn_with(FsConfigStore::at(dir.path()).unwrap()).await;
    let body: FavoritesBody = client
        .get(url(addr, FAVORITES_PATH))
        .header(IDENTITY_HEADER, ADA)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ids(&body), vec![550]);
}

#[tokio::test]
async fn health_check_answers() {
    let addr = spawn().await;
    let body = reqwest::get(url(addr, marquee_proto::HEALTH_PATH))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "ok");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_adds_on_disk_are_all_kept() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_with(FsConfigStore::at(dir.path()).unwrap()).await;
    let client = reqwest::Client::new();
    register(&client, addr, ADA).await;

    let mut adds = tokio::task::JoinSet::new();
    for movie in 1..=20u64 {
        let client = client.clone();
        adds.spawn(async move {
            client
                .post(url(addr, FAVORITES_PATH))
                .header(IDENTITY_HEADER, ADA)
                .json(&json!({"movieId": movie}))
                .send()
                .await
                .unwrap()
                .status()
        });
    }
    while let Some(status) = adds.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    let body: FavoritesBody = client
        .get(url(addr, FAVORITES_PATH))
        .header(IDENTITY_HEADER, ADA)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mut got = ids(&body);
    got.sort_unstable();
    assert_eq!(got, (1..=20).collect::<Vec<_>>());
}

#[tokio::test]
async fn non_ascii_identity_reaches_its_account() {
    const JOSE: &str = "josé@example.com";
    let addr = spawn().await;
    let client = reqwest::Client::new();
    assert_eq!(register(&client, addr, JOSE).await.status(), StatusCode::CREATED);

    let resp = client
        .post(url(addr, FAVORITES_PATH))
        .header(IDENTITY_HEADER, JOSE)
        .json(&json!({"movieId": 550}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: FavoritesBody = resp.json().await.unwrap();
    assert_eq!(ids(&body), vec![550]);
}
