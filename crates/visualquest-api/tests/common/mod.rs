//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use visualquest_core::generation::StoryGenerator;
use visualquest_core::transcription::Transcriber;
use visualquest_session_store::InMemoryEventRepository;
use visualquest_test_support::{FixedClock, ScriptedGenerator, ScriptedTranscriber};

use visualquest_api::routes;
use visualquest_api::state::AppState;

/// Build the full app router over a shared in-memory store and the given
/// adapters, using the same route structure as `main.rs`.
pub fn build_test_app_with(
    store: Arc<InMemoryEventRepository>,
    generator: Arc<dyn StoryGenerator>,
    transcriber: Arc<dyn Transcriber>,
) -> Router {
    let clock = Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(),
    ));
    let app_state = AppState::new(clock, store, generator, transcriber);

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/adventures", routes::adventure::router())
        .with_state(app_state)
}

/// Build the full app router with scripted adapters over a shared store.
pub fn build_test_app(store: Arc<InMemoryEventRepository>) -> Router {
    build_test_app_with(
        store,
        Arc::new(ScriptedGenerator::default()),
        Arc::new(ScriptedTranscriber::new("a transcribed decision")),
    )
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
