//! Feedback endpoint
//!
//! A session accepts one complete rating. Repeat submissions are answered
//! with HTTP 200 and a domain code of 400.

use axum::{extract::State, routing::post, Json, Router};

use crate::db::records::{apply_feedback, FeedbackOutcome};
use crate::error::ApiResult;
use crate::models::{FeedbackRequest, FeedbackResponse, FormFields};
use crate::AppState;

/// POST /comment
pub async fn submit_feedback(
    State(state): State<AppState>,
    fields: FormFields,
) -> ApiResult<Json<FeedbackResponse>> {
    let feedback = FeedbackRequest::from_fields(&fields)?;

    let response = match apply_feedback(&state.db, &feedback).await? {
        FeedbackOutcome::AlreadyRated => {
            tracing::info!(session_id = %feedback.session_id, "Duplicate feedback rejected");
            FeedbackResponse::already_rated()
        }
        FeedbackOutcome::Applied { rows_updated: 0 } => {
            tracing::warn!(session_id = %feedback.session_id, "Feedback for unknown session");
            FeedbackResponse::recorded()
        }
        FeedbackOutcome::Applied { rows_updated } => {
            tracing::info!(session_id = %feedback.session_id, rows_updated, "Feedback recorded");
            FeedbackResponse::recorded()
        }
    };

    Ok(Json(response))
}

pub fn feedback_routes() -> Router<AppState> {
    Router::new().route("/comment", post(submit_feedback))
}
