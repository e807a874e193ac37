//! Endpoint contract tests against an in-process server.
//!
//! Each test spawns an axum server on 127.0.0.1:0 backed by in-memory
//! SQLite and drives it through reqwest, exercising the full
//! request/response cycle.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use serde_json::{json, Value};

async fn spawn_server() -> String {
    recall_server::test_helpers::spawn_test_server().await.base_url
}

async fn post(url: String, body: Value) -> (reqwest::StatusCode, Value) {
    let resp = reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    let body: Value = resp.json().await.unwrap();
    (status, body)
}

fn store_image_body(image: &[u8], description: &str, name: &str, relation: &str) -> Value {
    json!({
        "image": B64.encode(image),
        "description": description,
        "name": name,
        "relation": relation,
    })
}

#[tokio::test]
async fn health_check() {
    let url = spawn_server().await;
    let resp = reqwest::get(format!("{url}/api/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn cors_is_open_to_all_origins() {
    let url = spawn_server().await;
    let resp = reqwest::Client::new()
        .get(format!("{url}/api/health"))
        .header("Origin", "http://somewhere.example")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp
        .headers()
        .contains_key("access-control-allow-origin"));
}

// ---- /api/store-image + /api/match-image ----

#[tokio::test]
async fn store_then_match_returns_person_details() {
    let url = spawn_server().await;

    let (status, body) = post(
        format!("{url}/api/store-image"),
        store_image_body(b"jpeg-bytes-of-alice", "my daughter", "Alice", "daughter"),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Image stored successfully.");

    let (status, body) = post(
        format!("{url}/api/match-image"),
        json!({ "image": B64.encode(b"jpeg-bytes-of-alice") }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Matching image found.");
    assert_eq!(body["data"]["name"], "Alice");
    assert_eq!(body["data"]["relation"], "daughter");
    assert_eq!(body["data"]["description"], "my daughter");
}

#[tokio::test]
async fn match_requires_exact_bytes() {
    let url = spawn_server().await;

    post(
        format!("{url}/api/store-image"),
        store_image_body(b"jpeg-bytes-of-alice", "my daughter", "Alice", "daughter"),
    )
    .await;

    // One byte off, as a re-encoded image would be.
    let (status, body) = post(
        format!("{url}/api/match-image"),
        json!({ "image": B64.encode(b"jpeg-bytes-of-alicE") }),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["response"], "No matching image found.");
}

#[tokio::test]
async fn store_image_missing_relation_is_rejected() {
    let url = spawn_server().await;

    let (status, body) = post(
        format!("{url}/api/store-image"),
        json!({
            "image": B64.encode(b"bytes"),
            "description": "my daughter",
            "name": "Alice",
        }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(
        body["error"],
        "Image, description, name, and relation are required."
    );
}

#[tokio::test]
async fn store_image_malformed_base64_folds_to_failure() {
    let url = spawn_server().await;

    let (status, body) = post(
        format!("{url}/api/store-image"),
        json!({
            "image": "not!!valid@@base64",
            "description": "my daughter",
            "name": "Alice",
            "relation": "daughter",
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["error"], "Failed to store image.");
}

#[tokio::test]
async fn match_image_missing_field_is_rejected() {
    let url = spawn_server().await;

    let (status, body) = post(format!("{url}/api/match-image"), json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Image data is required.");
}

#[tokio::test]
async fn match_image_malformed_base64_is_no_match() {
    let url = spawn_server().await;

    let (status, body) = post(
        format!("{url}/api/match-image"),
        json!({ "image": "not!!valid@@base64" }),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["response"], "No matching image found.");
}

// ---- /api/store-task + /api/process-input ----

#[tokio::test]
async fn store_task_then_query_matches_closest() {
    let url = spawn_server().await;

    for task in ["buy milk", "walk the dog"] {
        let (status, body) =
            post(format!("{url}/api/store-task"), json!({ "message": task })).await;
        assert_eq!(status, 200);
        assert_eq!(body["message"], "Task stored successfully.");
    }

    let (status, body) = post(
        format!("{url}/api/process-input"),
        json!({ "text": "I need to walk my dog" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["response"], "walk the dog");
    assert_eq!(body["tasks"], json!(["buy milk", "walk the dog"]));
}

#[tokio::test]
async fn store_task_missing_message_is_rejected() {
    let url = spawn_server().await;

    let (status, body) = post(format!("{url}/api/store-task"), json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Task is required.");
}

#[tokio::test]
async fn process_input_with_no_tasks() {
    let url = spawn_server().await;

    let (status, body) = post(
        format!("{url}/api/process-input"),
        json!({ "text": "what's next?" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["response"], "You don't have any scheduled tasks.");
}

#[tokio::test]
async fn unrelated_query_returns_sentinel() {
    let url = spawn_server().await;

    post(format!("{url}/api/store-task"), json!({ "message": "buy milk" })).await;

    let (status, body) = post(
        format!("{url}/api/process-input"),
        json!({ "text": "quantum chromodynamics lecture" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(
        body["response"],
        "I couldn't find anything related to your request."
    );
    assert_eq!(body["tasks"], json!(["buy milk"]));
}

#[tokio::test]
async fn completion_phrase_deletes_task() {
    let url = spawn_server().await;

    post(
        format!("{url}/api/store-task"),
        json!({ "message": "walk the dog" }),
    )
    .await;

    let (status, body) = post(
        format!("{url}/api/process-input"),
        json!({ "text": "I completed the task walk the dog" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["response"], "Task 'walk the dog' has been deleted.");

    // The task is gone; a repeat completion finds nothing.
    let (status, body) = post(
        format!("{url}/api/process-input"),
        json!({ "text": "I completed the task walk the dog" }),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["response"], "No matching task found for 'walk the dog'.");

    let (_, body) = post(
        format!("{url}/api/process-input"),
        json!({ "text": "anything left?" }),
    )
    .await;
    assert_eq!(body["response"], "You don't have any scheduled tasks.");
}
