use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use recall_core::image::CreateImage;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/store-image", post(store_image))
        .route("/api/match-image", post(match_image))
}

#[derive(Debug, Deserialize)]
struct StoreImageRequest {
    #[serde(default)]
    image: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    relation: String,
}

async fn store_image(
    State(state): State<AppState>,
    Json(req): Json<StoreImageRequest>,
) -> (StatusCode, Json<Value>) {
    if req.image.is_empty()
        || req.description.is_empty()
        || req.name.is_empty()
        || req.relation.is_empty()
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Image, description, name, and relation are required." })),
        );
    }

    let image_data = match B64.decode(&req.image) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("invalid base64 image payload: {e}");
            return store_failed();
        }
    };

    let input = CreateImage {
        description: req.description,
        name: req.name,
        relation: req.relation,
        image_data,
    };
    match state.db.store_image(&input) {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "message": "Image stored successfully." })),
        ),
        Err(e) => {
            error!("storing image failed: {e}");
            store_failed()
        }
    }
}

// Storage and decode failures share one opaque response shape; the client
// is not told whether the store was unreachable or the payload was bad.
fn store_failed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "error": "Failed to store image." })),
    )
}

#[derive(Debug, Deserialize)]
struct MatchImageRequest {
    #[serde(default)]
    image: String,
}

async fn match_image(
    State(state): State<AppState>,
    Json(req): Json<MatchImageRequest>,
) -> (StatusCode, Json<Value>) {
    if req.image.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Image data is required." })),
        );
    }

    let candidate = match B64.decode(&req.image) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("invalid base64 image payload: {e}");
            return no_match();
        }
    };

    match state.db.match_image(&candidate) {
        Ok(Some(matched)) => (
            StatusCode::OK,
            Json(json!({ "message": "Matching image found.", "data": matched })),
        ),
        Ok(None) => no_match(),
        Err(e) => {
            error!("matching image failed: {e}");
            no_match()
        }
    }
}

fn no_match() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "response": "No matching image found." })),
    )
}
