use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-text reminder task. `created_at` is always server-assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub task: String,
    pub created_at: DateTime<Utc>,
}
