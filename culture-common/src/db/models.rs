//! Database models

use serde::{Deserialize, Serialize};

/// One persisted upload, later annotated with user feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UploadRecord {
    pub id: i64,
    /// Category string exactly as declared by the client
    pub category: String,
    pub session_id: String,
    /// Local time, `YYYY-MM-DD HH:MM:SS`
    pub segmented_at: String,
    pub output_path: String,
    pub speed_rating: Option<String>,
    pub effectiveness_rating: Option<String>,
    pub feedback_text: Option<String>,
}

impl UploadRecord {
    /// True once all three feedback fields hold non-empty values
    pub fn is_fully_rated(&self) -> bool {
        [
            &self.speed_rating,
            &self.effectiveness_rating,
            &self.feedback_text,
        ]
        .iter()
        .all(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }
}
