use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use recall_core::intent;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use super::AppState;

/// Utterances containing this phrase are treated as task completions.
const COMPLETION_PHRASE: &str = "completed the task";
/// The substring stripped from the lower-cased utterance to recover the
/// task name.
const COMPLETION_PREFIX: &str = "i completed the task";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/store-task", post(store_task))
        .route("/api/process-input", post(process_input))
}

#[derive(Debug, Deserialize)]
struct StoreTaskRequest {
    #[serde(default)]
    message: String,
}

async fn store_task(
    State(state): State<AppState>,
    Json(req): Json<StoreTaskRequest>,
) -> (StatusCode, Json<Value>) {
    if req.message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Task is required." })),
        );
    }

    match state.db.store_task(&req.message) {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "message": "Task stored successfully." })),
        ),
        Err(e) => {
            error!("storing task failed: {e}");
            (
                StatusCode::OK,
                Json(json!({ "error": "Failed to store task." })),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProcessInputRequest {
    #[serde(default)]
    text: String,
}

async fn process_input(
    State(state): State<AppState>,
    Json(req): Json<ProcessInputRequest>,
) -> (StatusCode, Json<Value>) {
    let lowered = req.text.to_lowercase();
    if lowered.contains(COMPLETION_PHRASE) {
        // Completion bypasses the matcher: the remainder of the utterance
        // is the task name, in the casing the lowering produced.
        let task_name = lowered.replace(COMPLETION_PREFIX, "").trim().to_string();
        let deleted = state.db.delete_task_by_text(&task_name).unwrap_or_else(|e| {
            error!("deleting task failed: {e}");
            false
        });
        if deleted {
            return (
                StatusCode::OK,
                Json(json!({ "response": format!("Task '{task_name}' has been deleted.") })),
            );
        }
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "response": format!("No matching task found for '{task_name}'.") })),
        );
    }

    let tasks = state.db.list_tasks().unwrap_or_else(|e| {
        error!("listing tasks failed: {e}");
        Vec::new()
    });
    if tasks.is_empty() {
        return (
            StatusCode::OK,
            Json(json!({ "response": "You don't have any scheduled tasks." })),
        );
    }

    let texts: Vec<String> = tasks.into_iter().map(|t| t.task).collect();
    let response = intent::find_intent(&req.text, &texts).unwrap_or(intent::NO_MATCH_RESPONSE);
    (
        StatusCode::OK,
        Json(json!({ "response": response, "tasks": texts })),
    )
}
