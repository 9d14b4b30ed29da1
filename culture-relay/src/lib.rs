//! culture-relay library
//!
//! HTTP relay between the heritage client app and the remote segmentation
//! and color services. Uploads and their feedback are tracked in SQLite.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use culture_common::config::DEFAULT_MAX_UPLOAD_BYTES;
use services::{ColorClient, UploadOrchestrator};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub uploads: UploadOrchestrator,
    pub colors: Arc<ColorClient>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(db: SqlitePool, uploads: UploadOrchestrator, colors: ColorClient) -> Self {
        Self {
            db,
            uploads,
            colors: Arc::new(colors),
            startup_time: Utc::now(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(api::upload_routes())
        .merge(api::feedback_routes())
        .merge(api::color_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
