use std::time::Duration;

use chrono::Utc;
use recall_db::{Db, DbError};
use tracing::{error, info};

/// Tasks older than this many days are purged.
pub const RETENTION_DAYS: i64 = 7;

/// One sweep every 24 hours for the lifetime of the process. The timer is
/// not persisted; each process start begins a fresh cycle.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Background task that purges tasks past the retention window. A failed
/// sweep is logged and swallowed; the next tick runs regardless.
pub async fn run_janitor(db: Db, sweep_interval: Duration) {
    let mut ticker = tokio::time::interval(sweep_interval);
    loop {
        ticker.tick().await;
        if let Err(e) = purge_expired(&db) {
            error!("janitor error: {e}");
        }
    }
}

fn purge_expired(db: &Db) -> Result<(), DbError> {
    let cutoff = Utc::now() - chrono::Duration::days(RETENTION_DAYS);
    let purged = db.purge_tasks_older_than(cutoff)?;
    if purged > 0 {
        info!(purged, "removed expired tasks");
    }
    Ok(())
}
