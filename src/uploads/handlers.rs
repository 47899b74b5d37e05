use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/uploads", post(upload_image))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_url: String,
}

/// Accepts a single `image` multipart field. The stored filename is always
/// generated server-side; the client-supplied name never touches the
/// filesystem.
#[instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(ApiError::bad_request("No image uploaded"));
        }

        let ext = ext_from_mime(&content_type).unwrap_or("bin");
        let filename = format!("{}.{}", Uuid::new_v4(), ext);

        state
            .storage
            .put_file(&filename, data)
            .await
            .map_err(ApiError::Internal)?;

        info!(%filename, content_type, "image uploaded");
        return Ok(Json(UploadResponse {
            image_url: format!("/uploads/{filename}"),
        }));
    }

    Err(ApiError::bad_request("No image uploaded"))
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}
