use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use vidstash_core::models::{NewVideo, Video};

#[utoipa::path(
    post,
    path = "/video",
    tag = "videos",
    request_body = NewVideo,
    responses(
        (status = 200, description = "Stored video with server-assigned id and dataUrl", body = Video),
        (status = 400, description = "Malformed metadata", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, metadata), fields(operation = "create_video"))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    ValidatedJson(metadata): ValidatedJson<NewVideo>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state
        .videos
        .create(metadata)
        .await
        .map_err(HttpAppError::from)?;

    tracing::info!(video_id = video.id, title = %video.title, "Created video");
    Ok(Json(video))
}
