//! Color-extraction proxy endpoint

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::Value;

use crate::error::ApiResult;
use crate::models::{ColorRequest, FormFields};
use crate::AppState;

/// POST /get_colors
///
/// Forwards `image` and `count`; the color service's status and JSON are
/// returned as is.
pub async fn get_colors(
    State(state): State<AppState>,
    fields: FormFields,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let request = ColorRequest::from_fields(fields)?;
    tracing::debug!(count = %request.count, bytes = request.image.bytes.len(), "Color request");

    let reply = state.colors.extract(&request).await?;
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(reply.body)))
}

pub fn color_routes() -> Router<AppState> {
    Router::new().route("/get_colors", post(get_colors))
}
