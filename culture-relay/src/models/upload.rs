//! Upload request/response types and the upload state machine
//!
//! An upload moves through:
//! RECEIVED → DIRECTORIES_PREPARED → SEGMENTING → MATERIALIZING → PERSISTED → RESPONDED
//! with FAILED reachable from SEGMENTING and MATERIALIZING.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::{ContentCategory, FormFields};
use crate::services::storage_layout::is_safe_file_name;

/// Validated `/upload` request
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Client-supplied session identifier (`uuid` field)
    pub session_id: String,
    /// Raw `type` value, stored verbatim in the upload record
    pub declared_type: String,
    pub category: ContentCategory,
    /// Text prompt forwarded to the segmentation service (`targetword` field)
    pub target_word: String,
    /// Original file name of the uploaded image
    pub image_name: String,
    pub image_bytes: Vec<u8>,
}

impl UploadRequest {
    /// Validate raw form fields; nothing touches disk before this succeeds
    pub fn from_fields(mut fields: FormFields) -> Result<Self, ApiError> {
        let image = fields.require_file("image")?;
        let session_id = fields.require_text("uuid")?.to_string();
        let declared_type = fields.require_text("type")?.to_string();
        let target_word = fields.require_text("targetword")?.to_string();

        if !is_safe_file_name(&session_id) {
            return Err(ApiError::Validation(format!(
                "Invalid session id '{}': must be a single non-empty path segment",
                session_id
            )));
        }

        let image_name = image.file_name.unwrap_or_default();
        if !is_safe_file_name(&image_name) {
            return Err(ApiError::Validation(format!(
                "Invalid image file name '{}'",
                image_name
            )));
        }

        Ok(Self {
            session_id,
            category: ContentCategory::classify(&declared_type),
            declared_type,
            target_word,
            image_name,
            image_bytes: image.bytes,
        })
    }
}

/// One segmented image as echoed back to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedImage {
    pub filename: String,
    pub base64_data: String,
}

/// `/upload` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub uuid: String,
    pub segmented_images: Vec<SegmentedImage>,
}

/// Upload workflow state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadState {
    /// Form fields read and category classified
    Received,
    /// Session directories exist and the raw image is on disk
    DirectoriesPrepared,
    /// Waiting on the remote segmentation service
    Segmenting,
    /// Decoding and writing segmented images
    Materializing,
    /// Upload record inserted
    Persisted,
    /// Response handed back to the HTTP layer
    Responded,
    /// Terminal failure with reason
    Failed(String),
}

/// In-memory tracking of a single upload request
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub session_id: String,
    pub state: UploadState,
    pub started_at: DateTime<Utc>,
}

impl UploadSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            state: UploadState::Received,
            started_at: Utc::now(),
        }
    }

    /// Move to `new_state`, returning the state left behind
    pub fn transition_to(&mut self, new_state: UploadState) -> UploadState {
        tracing::debug!(
            session_id = %self.session_id,
            from = ?self.state,
            to = ?new_state,
            "Upload state transition"
        );
        std::mem::replace(&mut self.state, new_state)
    }

    /// Record a failure and return its reason for propagation
    pub fn fail(&mut self, reason: impl Into<String>) -> String {
        let reason = reason.into();
        self.transition_to(UploadState::Failed(reason.clone()));
        reason
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, UploadState::Responded | UploadState::Failed(_))
    }

    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}
