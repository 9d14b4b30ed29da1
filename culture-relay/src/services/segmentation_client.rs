//! Segmentation service client
//!
//! Sends one image (`imageFile` part) and a text prompt (`text_prompt` field)
//! to the remote segmentation service. Only HTTP 200 with a JSON array of
//! `{filename, data}` objects counts as success. Failures are never retried.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("culture-relay/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Segmentation client errors
#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("Network error calling segmentation service: {0}")]
    Network(String),

    #[error("Segmentation service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed segmentation response: {0}")]
    Malformed(String),
}

impl SegmentationError {
    /// HTTP status received from the service, if the call got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            SegmentationError::Network(_) => None,
            SegmentationError::Status { status, .. } => Some(*status),
            SegmentationError::Malformed(_) => Some(200),
        }
    }
}

/// One entry of the segmentation response; `data` is base64
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentResult {
    pub filename: String,
    pub data: String,
}

/// Anything that can turn an image plus prompt into segment results
#[async_trait]
pub trait Segmenter: Send + Sync {
    async fn segment(
        &self,
        image: &[u8],
        filename: &str,
        prompt: &str,
    ) -> Result<Vec<SegmentResult>, SegmentationError>;
}

/// HTTP client for the remote segmentation service
pub struct SegmentationClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl SegmentationClient {
    /// `timeout` of `None` leaves calls unbounded
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, SegmentationError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| SegmentationError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Segmenter for SegmentationClient {
    async fn segment(
        &self,
        image: &[u8],
        filename: &str,
        prompt: &str,
    ) -> Result<Vec<SegmentResult>, SegmentationError> {
        let form = Form::new()
            .part(
                "imageFile",
                Part::bytes(image.to_vec()).file_name(filename.to_string()),
            )
            .text("text_prompt", prompt.to_string());

        tracing::debug!(
            endpoint = %self.endpoint,
            filename = %filename,
            image_bytes = image.len(),
            "Calling segmentation service"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SegmentationError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(SegmentationError::Status { status, body });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SegmentationError::Network(e.to_string()))?;

        let results: Vec<SegmentResult> = serde_json::from_slice(&body)
            .map_err(|e| SegmentationError::Malformed(e.to_string()))?;

        tracing::info!(
            endpoint = %self.endpoint,
            segments = results.len(),
            "Segmentation service call succeeded"
        );

        Ok(results)
    }
}
