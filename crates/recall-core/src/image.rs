use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored face image metadata. The raw bytes stay in the database layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub description: String,
    pub filename: String,
    pub name: String,
    pub relation: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateImage {
    pub description: String,
    pub name: String,
    pub relation: String,
    pub image_data: Vec<u8>,
}

/// The fields a successful match reveals about the stored person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMatch {
    pub name: String,
    pub relation: String,
    pub description: String,
}

/// Derive the stored filename from a description: spaces become
/// underscores, with a fixed `.jpg` extension.
pub fn filename_from_description(description: &str) -> String {
    format!("{}.jpg", description.replace(' ', "_"))
}
