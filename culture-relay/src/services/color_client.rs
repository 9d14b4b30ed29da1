//! Color-extraction proxy client
//!
//! Forwards an image (`image` part) and `count` to the color service and
//! hands back whatever JSON it answers with, together with its status.
//! Error statuses with a JSON body are replies too, not failures.

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use thiserror::Error;

use crate::models::{ColorRequest, UploadedFile};

const USER_AGENT: &str = concat!("culture-relay/", env!("CARGO_PKG_VERSION"));

/// Color client errors
#[derive(Debug, Error)]
pub enum ColorError {
    #[error("Network error calling color service: {0}")]
    Network(String),

    #[error("Color service returned a non-JSON body (status {status}): {reason}")]
    Parse { status: u16, reason: String },
}

/// Reply of the color service, relayed unchanged
#[derive(Debug, Clone, PartialEq)]
pub struct ColorReply {
    pub status: u16,
    pub body: Value,
}

/// HTTP client for the remote color service
pub struct ColorClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl ColorClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ColorError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ColorError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Forward the request and return the service's status and JSON body untouched
    pub async fn extract(&self, request: &ColorRequest) -> Result<ColorReply, ColorError> {
        let form = Form::new()
            .part("image", image_part(&request.image))
            .text("count", request.count.clone());

        let response = self
            .http_client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ColorError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body: Value = response.json().await.map_err(|e| ColorError::Parse {
            status,
            reason: e.to_string(),
        })?;

        if (200..300).contains(&status) {
            tracing::debug!(endpoint = %self.endpoint, count = %request.count, "Color service call succeeded");
        } else {
            tracing::warn!(endpoint = %self.endpoint, status, "Color service answered with an error status");
        }

        Ok(ColorReply { status, body })
    }
}

/// Multipart part carrying the client's file name and content type when usable
fn image_part(file: &UploadedFile) -> Part {
    let name = file
        .file_name
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "image".to_string());
    let part = Part::bytes(file.bytes.clone()).file_name(name.clone());

    match &file.content_type {
        Some(content_type) => part.mime_str(content_type).unwrap_or_else(|_| {
            tracing::debug!(content_type = %content_type, "Ignoring unparsable content type");
            Part::bytes(file.bytes.clone()).file_name(name)
        }),
        None => part,
    }
}
