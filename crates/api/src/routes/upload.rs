use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::AdminCaller;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const UPLOAD_FOLDERS: &[&str] = &["services", "therapists"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/upload-image", post(upload_image))
        // Leave room for multipart framing around a maximum-size file.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    url: String,
}

async fn upload_image(
    admin: AdminCaller,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut file = None;
    let mut folder = None;
    let mut record_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                file = Some((content_type, bytes));
            }
            Some("folder") => {
                folder = Some(field.text().await.map_err(|e| ApiError::BadRequest(e.body_text()))?)
            }
            Some("recordId") => {
                record_id =
                    Some(field.text().await.map_err(|e| ApiError::BadRequest(e.body_text()))?)
            }
            _ => {}
        }
    }

    let (content_type, bytes) =
        file.ok_or_else(|| ApiError::BadRequest("file is required".to_string()))?;
    let folder = folder.unwrap_or_default();
    let record_id = record_id.unwrap_or_default();
    let extension = validate_upload(&folder, &record_id, &content_type, bytes.len())?;

    let key = format!("{folder}/{record_id}/{}.{extension}", Uuid::new_v4());
    let size = bytes.len();
    let url = state
        .objects()
        .put(&key, &content_type, bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("upload failed: {e}")))?;

    tracing::info!(actor = %admin.uid, key = %key, size, "image uploaded");
    Ok(Json(UploadResponse { url }))
}

/// Check the upload form and return the file extension to store under.
fn validate_upload(
    folder: &str,
    record_id: &str,
    content_type: &str,
    size: usize,
) -> ApiResult<&'static str> {
    if !UPLOAD_FOLDERS.contains(&folder) {
        return Err(ApiError::BadRequest(format!(
            "folder must be one of: {}",
            UPLOAD_FOLDERS.join(", ")
        )));
    }
    let valid_record_id = !record_id.is_empty()
        && record_id.len() <= 128
        && record_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_record_id {
        return Err(ApiError::BadRequest("recordId is invalid".to_string()));
    }
    if size == 0 {
        return Err(ApiError::BadRequest("file is empty".to_string()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ApiError::BadRequest("file must be 10MB or smaller".to_string()));
    }
    let extension = match content_type {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/avif" => "avif",
        // Raster formats only.
        other if other.starts_with("image/") => {
            return Err(ApiError::BadRequest(format!("unsupported image type: {other}")))
        }
        _ => return Err(ApiError::BadRequest("file must be an image".to_string())),
    };
    Ok(extension)
}
