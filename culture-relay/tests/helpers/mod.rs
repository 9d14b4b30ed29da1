//! Shared fixtures for HTTP-level tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use std::sync::Arc;
use tempfile::TempDir;

use culture_common::db::init_database;
use culture_relay::services::{
    ColorClient, SegmentResult, SegmentationError, Segmenter, StorageLayout, UploadOrchestrator,
};
use culture_relay::AppState;

pub const BOUNDARY: &str = "culture-relay-test-boundary";

/// Hand-built multipart/form-data body
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// Urlencoded POST request
pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Segmenter returning a fixed outcome
pub enum StubSegmenter {
    Succeed(Vec<SegmentResult>),
    FailWithStatus(u16),
}

#[async_trait]
impl Segmenter for StubSegmenter {
    async fn segment(
        &self,
        _image: &[u8],
        _filename: &str,
        _prompt: &str,
    ) -> Result<Vec<SegmentResult>, SegmentationError> {
        match self {
            StubSegmenter::Succeed(results) => Ok(results.clone()),
            StubSegmenter::FailWithStatus(status) => Err(SegmentationError::Status {
                status: *status,
                body: "stub failure".to_string(),
            }),
        }
    }
}

pub fn segment(filename: &str, data: &str) -> SegmentResult {
    SegmentResult {
        filename: filename.to_string(),
        data: data.to_string(),
    }
}

/// App state over a temp directory; keep the `TempDir` alive for the test
pub async fn test_app_state(segmenter: StubSegmenter, color_endpoint: &str) -> (TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("relay.db")).await.unwrap();

    let uploads = UploadOrchestrator::new(
        StorageLayout::new(dir.path().join("uploaded_images")),
        Arc::new(segmenter),
        pool.clone(),
    );
    let colors = ColorClient::new(color_endpoint).unwrap();

    (dir, AppState::new(pool, uploads, colors))
}
