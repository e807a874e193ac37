pub mod janitor;
mod routes;
pub mod test_helpers;

use std::sync::Arc;

use anyhow::Result;
use recall_db::Db;
use tokio::net::TcpListener;

use routes::InnerAppState;

pub async fn serve(listener: TcpListener, db: Db) -> Result<()> {
    tokio::spawn(janitor::run_janitor(db.clone(), janitor::SWEEP_INTERVAL));
    let app = routes::build_router(Arc::new(InnerAppState { db }));
    axum::serve(listener, app).await?;
    Ok(())
}
