//! Upload record operations
//!
//! The orchestrator inserts one row per successful upload; the feedback
//! workflow is the only writer of the three feedback columns.

use culture_common::db::UploadRecord;
use culture_common::Result;
use sqlx::SqlitePool;

use crate::models::FeedbackRequest;

/// Values for a fresh upload record
#[derive(Debug, Clone)]
pub struct NewUploadRecord {
    pub category: String,
    pub session_id: String,
    pub segmented_at: String,
    pub output_path: String,
}

/// Result of a feedback submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// Feedback written to every row of the session (possibly none)
    Applied { rows_updated: u64 },
    /// Session was already fully rated; nothing written
    AlreadyRated,
}

/// Insert an upload record and return its row id
///
/// No uniqueness check: repeated uploads for a session add rows.
pub async fn insert_upload(pool: &SqlitePool, record: &NewUploadRecord) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO upload_records (category, session_id, segmented_at, output_path)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&record.category)
    .bind(&record.session_id)
    .bind(&record.segmented_at)
    .bind(&record.output_path)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Store feedback for a session unless its first record is already fully rated
///
/// Check and update share one transaction.
pub async fn apply_feedback(pool: &SqlitePool, feedback: &FeedbackRequest) -> Result<FeedbackOutcome> {
    let mut tx = pool.begin().await?;

    let existing: Option<UploadRecord> = sqlx::query_as(
        "SELECT * FROM upload_records WHERE session_id = ? ORDER BY id LIMIT 1",
    )
    .bind(&feedback.session_id)
    .fetch_optional(&mut *tx)
    .await?;

    if existing.as_ref().is_some_and(UploadRecord::is_fully_rated) {
        tx.rollback().await?;
        return Ok(FeedbackOutcome::AlreadyRated);
    }

    let result = sqlx::query(
        r#"
        UPDATE upload_records
        SET speed_rating = ?, effectiveness_rating = ?, feedback_text = ?
        WHERE session_id = ?
        "#,
    )
    .bind(&feedback.speed_rating)
    .bind(&feedback.effectiveness_rating)
    .bind(&feedback.feedback_text)
    .bind(&feedback.session_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(FeedbackOutcome::Applied {
        rows_updated: result.rows_affected(),
    })
}

/// All records of a session, oldest first
pub async fn find_by_session(pool: &SqlitePool, session_id: &str) -> Result<Vec<UploadRecord>> {
    let records = sqlx::query_as("SELECT * FROM upload_records WHERE session_id = ? ORDER BY id")
        .bind(session_id)
        .fetch_all(pool)
        .await?;
    Ok(records)
}
