//! Upload endpoint

use axum::{extract::State, routing::post, Json, Router};

use crate::error::ApiResult;
use crate::models::{FormFields, UploadRequest, UploadResponse};
use crate::AppState;

/// POST /upload
///
/// Multipart fields: `image` (file), `uuid`, `type`, `targetword`.
pub async fn upload_image(
    State(state): State<AppState>,
    fields: FormFields,
) -> ApiResult<Json<UploadResponse>> {
    let request = UploadRequest::from_fields(fields)?;

    tracing::info!(
        session_id = %request.session_id,
        declared_type = %request.declared_type,
        image = %request.image_name,
        bytes = request.image_bytes.len(),
        "Upload received"
    );

    let response = state.uploads.run(request).await?;
    Ok(Json(response))
}

pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload_image))
}
