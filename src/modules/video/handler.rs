use super::model::Video;
use super::service::UploadService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::middleware::auth::TokenClaims;
use crate::state::AppState;
use axum::{
    extract::{Extension, Multipart, Path, State},
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

/// Upload the video file for a video record
///
/// The file is remuxed for fast start and stored under its aspect-ratio prefix.
#[utoipa::path(
    put,
    path = "/api/v1/videos/{id}/upload",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = String, content_type = "multipart/form-data", description = "File field `video` (video/mp4, at most 1 GiB)"),
    responses(
        (status = 200, description = "Video uploaded", body = ApiResponse<Video>),
        (status = 400, description = "Missing, oversized or wrongly typed file"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller does not own the video"),
        (status = 404, description = "Video not found"),
        (status = 500, description = "Processing or storage failure")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn upload_video(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> impl IntoResponse {
    info!(video_id = %id, user_id = %claims.sub, "uploading video");

    match UploadService::upload_video(&state, id, claims.sub, multipart).await {
        Ok(video) => ApiSuccess::ok(video, "Video uploaded successfully").into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Upload the thumbnail image for a video record
#[utoipa::path(
    put,
    path = "/api/v1/videos/{id}/thumbnail",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = String, content_type = "multipart/form-data", description = "File field `thumbnail` (image/jpeg or image/png, at most 10 MiB)"),
    responses(
        (status = 200, description = "Thumbnail uploaded", body = ApiResponse<Video>),
        (status = 400, description = "Missing, oversized or wrongly typed file"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller does not own the video"),
        (status = 404, description = "Video not found"),
        (status = 500, description = "Storage failure")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> impl IntoResponse {
    info!(video_id = %id, user_id = %claims.sub, "uploading thumbnail");

    match UploadService::upload_thumbnail(&state, id, claims.sub, multipart).await {
        Ok(video) => ApiSuccess::ok(video, "Thumbnail uploaded successfully").into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
