//! Error types for culture-relay
//!
//! Internal causes are logged; clients only ever see the fixed messages below.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::{ColorError, MaterializeError, UploadError};

pub const SEGMENTATION_FAILED_MESSAGE: &str = "Failed to call segmentation API";
pub const PERSISTENCE_FAILED_MESSAGE: &str = "Failed to persist upload record";
pub const STORAGE_FAILED_MESSAGE: &str = "Failed to store upload";
pub const COLOR_FAILED_MESSAGE: &str = "Failed to call color API";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid form input (400)
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Color(#[from] ColorError),

    /// culture-common error outside the upload workflow
    #[error("Database error: {0}")]
    Persistence(#[from] culture_common::Error),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Upload(err) => (StatusCode::INTERNAL_SERVER_ERROR, upload_message(err).to_string()),
            ApiError::Color(_) => (StatusCode::BAD_GATEWAY, COLOR_FAILED_MESSAGE.to_string()),
            ApiError::Persistence(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                PERSISTENCE_FAILED_MESSAGE.to_string(),
            ),
        }
    }
}

fn upload_message(err: &UploadError) -> &'static str {
    match err {
        UploadError::Segmentation(_) => SEGMENTATION_FAILED_MESSAGE,
        UploadError::Materialize(MaterializeError::Write { .. }) => STORAGE_FAILED_MESSAGE,
        UploadError::Materialize(_) => SEGMENTATION_FAILED_MESSAGE,
        UploadError::Storage(_) => STORAGE_FAILED_MESSAGE,
        UploadError::Persistence(_) => PERSISTENCE_FAILED_MESSAGE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), cause = %self, "Request failed");
        } else {
            tracing::debug!(cause = %self, "Request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
