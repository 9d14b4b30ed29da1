//! Upload workflow
//!
//! Runs one `/upload` request end to end: prepare the session directories,
//! store the raw image, call the segmentation service, write the decoded
//! results and record the upload. Any failure stops the workflow; files
//! already written are left in place.

use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use culture_common::time;

use crate::db::records::{insert_upload, NewUploadRecord};
use crate::models::{UploadRequest, UploadResponse, UploadSession, UploadState};
use crate::services::result_materializer::{materialize, MaterializeError};
use crate::services::segmentation_client::{SegmentationError, Segmenter};
use crate::services::storage_layout::{confined_path, StorageLayout};

/// Upload workflow errors, one variant per failing stage
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    #[error("Failed to record upload: {0}")]
    Persistence(#[from] culture_common::Error),
}

/// Shared handle driving uploads; cheap to clone into handlers
#[derive(Clone)]
pub struct UploadOrchestrator {
    layout: StorageLayout,
    segmenter: Arc<dyn Segmenter>,
    db: SqlitePool,
}

impl UploadOrchestrator {
    pub fn new(layout: StorageLayout, segmenter: Arc<dyn Segmenter>, db: SqlitePool) -> Self {
        Self {
            layout,
            segmenter,
            db,
        }
    }

    /// Execute the workflow for a validated request
    pub async fn run(&self, request: UploadRequest) -> Result<UploadResponse, UploadError> {
        let mut session = UploadSession::new(request.session_id.clone());

        let dirs = self
            .layout
            .prepare(&request.session_id, request.category)
            .await?;
        let input_path = confined_path(&dirs.input, &request.image_name)?;
        tokio::fs::write(&input_path, &request.image_bytes).await?;
        session.transition_to(UploadState::DirectoriesPrepared);

        session.transition_to(UploadState::Segmenting);
        let results = match self
            .segmenter
            .segment(&request.image_bytes, &request.image_name, &request.target_word)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                let reason = session.fail(e.to_string());
                warn!(
                    session_id = %request.session_id,
                    status = ?e.status(),
                    reason = %reason,
                    "Segmentation failed"
                );
                return Err(e.into());
            }
        };

        session.transition_to(UploadState::Materializing);
        let segmented_images = match materialize(results, &dirs.output).await {
            Ok(images) => images,
            Err(e) => {
                let reason = session.fail(e.to_string());
                warn!(session_id = %request.session_id, reason = %reason, "Materializing results failed");
                return Err(e.into());
            }
        };

        let record = NewUploadRecord {
            category: request.declared_type.clone(),
            session_id: request.session_id.clone(),
            segmented_at: time::record_timestamp(time::now()),
            output_path: dirs.output.display().to_string(),
        };
        let record_id = insert_upload(&self.db, &record).await?;
        session.transition_to(UploadState::Persisted);

        session.transition_to(UploadState::Responded);
        info!(
            session_id = %request.session_id,
            category = ?request.category,
            record_id,
            images = segmented_images.len(),
            elapsed_ms = session.elapsed_ms(),
            terminal = session.is_terminal(),
            "Upload segmented"
        );

        Ok(UploadResponse {
            uuid: request.session_id,
            segmented_images,
        })
    }
}
