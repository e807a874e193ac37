pub mod health;
pub mod images;
pub mod tasks;

use std::sync::Arc;

use axum::Router;
use recall_db::Db;
use tower_http::cors::CorsLayer;

pub struct InnerAppState {
    pub db: Db,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(images::routes())
        .merge(tasks::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
