use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use recall_core::task::Task;

use crate::{Db, DbError};

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        task: row.get("task")?,
        created_at: row.get("created_at")?,
    })
}

impl Db {
    /// Insert one task with the current UTC timestamp. No dedup: the same
    /// text stored twice yields two rows.
    pub fn store_task(&self, text: &str) -> Result<Task, DbError> {
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO tasks (id, task, created_at) VALUES (?1, ?2, ?3)",
                params![id, text, now],
            )?;
            tracing::info!(task = %text, "stored task");
            conn.query_row("SELECT * FROM tasks WHERE id = ?1", params![id], row_to_task)
                .map_err(DbError::from)
        })
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM tasks ORDER BY created_at")?;
            let tasks = stmt
                .query_map([], row_to_task)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tasks)
        })
    }

    /// Delete every row whose text equals `text` exactly (case-sensitive).
    /// Returns whether at least one row was removed.
    pub fn delete_task_by_text(&self, text: &str) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM tasks WHERE task = ?1", params![text])?;
            if deleted > 0 {
                tracing::info!(task = %text, rows = deleted, "deleted task");
            }
            Ok(deleted > 0)
        })
    }

    /// Delete every task created strictly before `cutoff`. Returns the
    /// number of rows removed; a no-op when nothing is old enough.
    pub fn purge_tasks_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, DbError> {
        self.with_conn(|conn| {
            let purged =
                conn.execute("DELETE FROM tasks WHERE created_at < ?1", params![cutoff])?;
            Ok(purged)
        })
    }
}
