//! Integration tests for the narrative session context.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use uuid::Uuid;
use visualquest_session_store::InMemoryEventRepository;
use visualquest_test_support::{FailingTranscriber, ScriptedGenerator, ScriptedTranscriber};

fn attach_body(session_id: Uuid) -> serde_json::Value {
    serde_json::json!({
        "session_id": session_id,
        "image_base64": "aGVsbG8=",
        "content_type": "image/jpeg",
    })
}

#[tokio::test]
async fn test_full_adventure_round_trip_with_step_limit_3() {
    let store = Arc::new(InMemoryEventRepository::new());
    let session_id = Uuid::new_v4();

    // Upload image.
    let (status, _) = common::post_json(
        common::build_test_app(store.clone()),
        "/api/v1/adventures/attach-image",
        &attach_body(session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Start.
    let (status, json) = common::post_json(
        common::build_test_app(store.clone()),
        "/api/v1/adventures/start",
        &serde_json::json!({ "session_id": session_id, "step_limit": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["concluded"], false);
    // The start returns the caption and the opening story segment.
    let segments = json["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0]["kind"], "caption");
    assert_eq!(segments[1]["kind"], "story");

    // Three decisions; the last one concludes.
    for (index, decision) in ["go left", "go right", "open door"].iter().enumerate() {
        let (status, json) = common::post_json(
            common::build_test_app(store.clone()),
            "/api/v1/adventures/decide",
            &serde_json::json!({ "session_id": session_id, "text": decision }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let concluded = index == 2;
        assert_eq!(json["concluded"], concluded);
        let segments = json["segments"].as_array().unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0]["kind"], "decision");
        assert_eq!(segments[0]["text"], *decision);
        assert_eq!(
            segments[1]["kind"],
            if concluded { "conclusion" } else { "story" }
        );
    }

    // Verify the completed session's history.
    let (status, json) = common::get_json(
        common::build_test_app(store.clone()),
        &format!("/api/v1/adventures/{session_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phase"], "complete");
    assert_eq!(json["step_count"], 3);
    assert_eq!(json["step_limit"], 3);

    let segments = json["segments"].as_array().unwrap();
    // 3 decisions plus 5 generated segments: caption, opening, two
    // continuations, conclusion.
    assert_eq!(segments.len(), 8);
    let decisions = segments.iter().filter(|s| s["kind"] == "decision").count();
    let generated = segments.iter().filter(|s| s["kind"] != "decision").count();
    assert_eq!(decisions, 3);
    assert_eq!(generated, 5);
    assert_eq!(segments.last().unwrap()["kind"], "conclusion");

    // Further decisions are rejected.
    let (status, json) = common::post_json(
        common::build_test_app(store),
        "/api/v1/adventures/decide",
        &serde_json::json!({ "session_id": session_id, "text": "one more" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_spoken_decision_is_transcribed_and_recorded() {
    let store = Arc::new(InMemoryEventRepository::new());
    let session_id = Uuid::new_v4();
    let transcriber = Arc::new(ScriptedTranscriber::new("go through the gate"));

    let app = || {
        common::build_test_app_with(
            store.clone(),
            Arc::new(ScriptedGenerator::default()),
            transcriber.clone(),
        )
    };

    let (status, _) = common::post_json(
        app(),
        "/api/v1/adventures/attach-image",
        &attach_body(session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::post_json(
        app(),
        "/api/v1/adventures/start",
        &serde_json::json!({ "session_id": session_id, "step_limit": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // A spoken decision: base64 audio instead of text.
    let (status, json) = common::post_json(
        app(),
        "/api/v1/adventures/decide",
        &serde_json::json!({ "session_id": session_id, "audio_base64": "c3BlYWs=" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let segments = json["segments"].as_array().unwrap();
    assert_eq!(segments[0]["kind"], "decision");
    assert_eq!(segments[0]["text"], "go through the gate");
    assert_eq!(transcriber.received_lengths(), vec![5]);
}

#[tokio::test]
async fn test_transcription_failure_surfaces_as_502_and_records_nothing() {
    let store = Arc::new(InMemoryEventRepository::new());
    let session_id = Uuid::new_v4();

    let app = || {
        common::build_test_app_with(
            store.clone(),
            Arc::new(ScriptedGenerator::default()),
            Arc::new(FailingTranscriber),
        )
    };

    let (status, _) = common::post_json(
        app(),
        "/api/v1/adventures/attach-image",
        &attach_body(session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::post_json(
        app(),
        "/api/v1/adventures/start",
        &serde_json::json!({ "session_id": session_id, "step_limit": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Act
    let (status, json) = common::post_json(
        app(),
        "/api/v1/adventures/decide",
        &serde_json::json!({ "session_id": session_id, "audio_base64": "c3BlYWs=" }),
    )
    .await;

    // Assert — the failure degrades to an error response, and the session
    // is still awaiting its first decision.
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "transcription_failed");

    let (_, json) = common::get_json(app(), &format!("/api/v1/adventures/{session_id}")).await;
    assert_eq!(json["phase"], "awaiting_choice");
    assert_eq!(json["step_count"], 0);
}

#[tokio::test]
async fn test_start_twice_is_rejected() {
    let store = Arc::new(InMemoryEventRepository::new());
    let session_id = Uuid::new_v4();

    let (status, _) = common::post_json(
        common::build_test_app(store.clone()),
        "/api/v1/adventures/attach-image",
        &attach_body(session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let start_body = serde_json::json!({ "session_id": session_id, "step_limit": 3 });
    let (status, _) = common::post_json(
        common::build_test_app(store.clone()),
        "/api/v1/adventures/start",
        &start_body,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Act — the start guard only fires once per session.
    let (status, json) = common::post_json(
        common::build_test_app(store),
        "/api/v1/adventures/start",
        &start_body,
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_step_limit_out_of_bounds_is_rejected() {
    let store = Arc::new(InMemoryEventRepository::new());
    let session_id = Uuid::new_v4();

    let (status, _) = common::post_json(
        common::build_test_app(store.clone()),
        "/api/v1/adventures/attach-image",
        &attach_body(session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = common::post_json(
        common::build_test_app(store),
        "/api/v1/adventures/start",
        &serde_json::json!({ "session_id": session_id, "step_limit": 21 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_reset_returns_session_to_empty_state() {
    let store = Arc::new(InMemoryEventRepository::new());
    let session_id = Uuid::new_v4();

    let (status, _) = common::post_json(
        common::build_test_app(store.clone()),
        "/api/v1/adventures/attach-image",
        &attach_body(session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::post_json(
        common::build_test_app(store.clone()),
        "/api/v1/adventures/start",
        &serde_json::json!({ "session_id": session_id, "step_limit": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Act — reset mid-adventure.
    let (status, json) = common::post_json(
        common::build_test_app(store.clone()),
        "/api/v1/adventures/reset",
        &serde_json::json!({ "session_id": session_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session_id"], session_id.to_string());

    // Assert — the stream is gone.
    let (status, _) = common::get_json(
        common::build_test_app(store.clone()),
        &format!("/api/v1/adventures/{session_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // And the same session ID can host a fresh adventure.
    let (status, _) = common::post_json(
        common::build_test_app(store.clone()),
        "/api/v1/adventures/attach-image",
        &attach_body(session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::post_json(
        common::build_test_app(store),
        "/api/v1/adventures/start",
        &serde_json::json!({ "session_id": session_id, "step_limit": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_returns_in_progress_state() {
    let store = Arc::new(InMemoryEventRepository::new());
    let session_id = Uuid::new_v4();

    let (status, _) = common::post_json(
        common::build_test_app(store.clone()),
        "/api/v1/adventures/attach-image",
        &attach_body(session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = common::get_json(
        common::build_test_app(store),
        &format!("/api/v1/adventures/{session_id}"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session_id"], session_id.to_string());
    assert_eq!(json["phase"], "image_selected");
    assert_eq!(json["version"], 1);
    assert!(json["segments"].as_array().unwrap().is_empty());
}
