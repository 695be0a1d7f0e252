// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! End-to-end tests for the HTTP API

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use stringlens_server::{api::AppState, build_router};
use stringlens_storage::InMemoryRecordStore;
use tower::ServiceExt;

fn create_test_app() -> Router {
    let store = Arc::new(InMemoryRecordStore::new());
    build_router(AppState::new(store, 200))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_raw(uri: &str, content_type: Option<&str>, body: &'static str) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("Content-Type", content_type);
    }
    builder.body(Body::from(body)).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn create(value: &str) -> Request<Body> {
    post_json("/strings", json!({ "value": value }))
}

fn search(query: &str) -> Request<Body> {
    get(&format!(
        "/strings/filter-by-natural-language?query={}",
        query.replace(' ', "%20")
    ))
}

async fn seed(app: &Router, values: &[&str]) {
    for value in values {
        let (status, _) = send(app, create(value)).await;
        assert_eq!(status, StatusCode::CREATED, "seeding {value:?}");
    }
}

fn values(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["value"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_returns_analysis() {
    let app = create_test_app();

    let (status, body) = send(&app, create("  Racecar ")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["value"], "Racecar");
    assert_eq!(body["properties"]["length"], 7);
    assert_eq!(body["properties"]["is_palindrome"], true);
    assert_eq!(body["properties"]["unique_characters"], 5);
    assert_eq!(body["properties"]["word_count"], 1);
    assert_eq!(body["properties"]["sha256_hash"], body["id"]);
    assert_eq!(body["properties"]["character_frequency_map"]["r"], 1);
    assert_eq!(body["properties"]["character_frequency_map"]["R"], 1);
    assert_eq!(body["properties"]["character_frequency_map"]["a"], 2);
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_create_validation_and_conflict() {
    let app = create_test_app();

    let (status, body) = send(&app, post_json("/strings", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing 'value' field");

    let (status, _) = send(&app, post_json("/strings", json!({ "value": 12 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    seed(&app, &["hello"]).await;
    let (status, body) = send(&app, create("hello  ")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "String already exists");
}

#[tokio::test]
async fn test_create_rejects_non_json_bodies_with_json_errors() {
    let app = create_test_app();

    let requests = [
        post_raw("/strings", Some("application/json"), "{not json"),
        post_raw("/strings", Some("application/json"), ""),
        post_raw("/strings", None, r#"{"value": "hello"}"#),
        post_raw("/strings", Some("text/plain"), r#"{"value": "hello"}"#),
    ];

    for request in requests {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("Invalid JSON body"), "{error}");
    }

    let (_, body) = send(&app, get("/strings")).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_failed_persistence_is_reported() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("data");
    let store = Arc::new(InMemoryRecordStore::open(&data_dir).unwrap());
    let app = build_router(AppState::new(store, 200));

    seed(&app, &["kept"]).await;
    std::fs::remove_dir_all(&data_dir).unwrap();

    let (status, body) = send(&app, create("lost")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, get("/strings/lost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, delete("/strings/kept")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, get("/strings/kept")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_and_delete_by_value() {
    let app = create_test_app();
    seed(&app, &["hello world"]).await;

    let (status, body) = send(&app, get("/strings/hello%20world")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["properties"]["word_count"], 2);

    let (status, body) = send(&app, delete("/strings/hello%20world")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, get("/strings/hello%20world")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "String not found");

    let (status, _) = send(&app, delete("/strings/hello%20world")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_with_structured_filters() {
    let app = create_test_app();
    seed(&app, &["racecar", "hello world", "noon", "zebra crossing"]).await;

    let (status, body) = send(&app, get("/strings")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);
    assert_eq!(body["filters_applied"], json!({}));

    let (status, body) = send(
        &app,
        get("/strings?is_palindrome=true&min_length=5&contains_character=r"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(values(&body), vec!["racecar"]);
    assert_eq!(
        body["filters_applied"],
        json!({ "is_palindrome": true, "min_length": 5, "contains_character": "r" })
    );

    let (_, body) = send(&app, get("/strings?word_count=2&max_length=11")).await;
    assert_eq!(values(&body), vec!["hello world"]);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_list_rejects_bad_parameters() {
    let app = create_test_app();

    for uri in [
        "/strings?min_length=abc",
        "/strings?is_palindrome=maybe",
        "/strings?contains_character=xy",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("Invalid query parameter value"), "{error}");
    }
}

#[tokio::test]
async fn test_natural_language_search() {
    let app = create_test_app();
    seed(&app, &["racecar", "hello world", "noon", "zebra crossing", "a"]).await;

    let (status, body) = send(&app, search("all single word palindromic strings")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(values(&body), vec!["racecar", "noon", "a"]);
    assert_eq!(body["count"], 3);
    assert_eq!(
        body["interpreted_query"],
        json!({
            "original": "all single word palindromic strings",
            "parsed_filters": { "word_count": 1, "is_palindrome": true }
        })
    );

    let (_, body) = send(&app, search("strings containing the letter z")).await;
    assert_eq!(values(&body), vec!["zebra crossing"]);

    let (_, body) = send(&app, search("strings longer than 10 characters")).await;
    assert_eq!(values(&body), vec!["hello world", "zebra crossing"]);
    assert_eq!(
        body["interpreted_query"]["parsed_filters"],
        json!({ "min_length": 11 })
    );
}

#[tokio::test]
async fn test_natural_language_errors() {
    let app = create_test_app();

    let (status, body) = send(&app, get("/strings/filter-by-natural-language")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing query parameter");

    let (status, _) = send(&app, search("")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, search("xyzzy quux")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unable to parse natural language query");

    let long_query = format!("palindromes{}", " ".repeat(300));
    let (status, body) = send(&app, search(&long_query)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Query too long"), "{error}");
}

#[tokio::test]
async fn test_health_reports_store_stats() {
    let app = create_test_app();
    seed(&app, &["abba", "abc"]).await;

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"]["record_count"], 2);
    assert_eq!(body["storage"]["palindrome_count"], 1);
}
