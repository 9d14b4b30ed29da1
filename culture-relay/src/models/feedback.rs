//! Feedback and color-proxy request types

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::{FormFields, UploadedFile};

/// Validated `/comment` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRequest {
    pub session_id: String,
    pub speed_rating: String,
    pub effectiveness_rating: String,
    pub feedback_text: String,
}

impl FeedbackRequest {
    pub fn from_fields(fields: &FormFields) -> Result<Self, ApiError> {
        let session_id = fields.require_text("uuid")?.to_string();
        if session_id.is_empty() {
            return Err(ApiError::Validation("Session id must not be empty".to_string()));
        }

        Ok(Self {
            session_id,
            speed_rating: fields.require_text("speedRating")?.to_string(),
            effectiveness_rating: fields.require_text("effectivenessRating")?.to_string(),
            feedback_text: fields.require_text("feedbackText")?.to_string(),
        })
    }
}

pub const FEEDBACK_RECORDED_MESSAGE: &str = "Feedback recorded";
pub const FEEDBACK_DUPLICATE_MESSAGE: &str = "Feedback has already been submitted for this session";

/// `/comment` body; `code` is a domain code, the HTTP status is always 200
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub code: u16,
    pub message: String,
}

impl FeedbackResponse {
    pub fn recorded() -> Self {
        Self {
            code: 200,
            message: FEEDBACK_RECORDED_MESSAGE.to_string(),
        }
    }

    pub fn already_rated() -> Self {
        Self {
            code: 400,
            message: FEEDBACK_DUPLICATE_MESSAGE.to_string(),
        }
    }
}

/// Validated `/get_colors` request
#[derive(Debug, Clone)]
pub struct ColorRequest {
    pub image: UploadedFile,
    /// Number of colors requested, forwarded exactly as received
    pub count: String,
}

impl ColorRequest {
    pub fn from_fields(mut fields: FormFields) -> Result<Self, ApiError> {
        let image = fields.require_file("image")?;
        let count = fields.require_text("count")?.to_string();
        Ok(Self { image, count })
    }
}
