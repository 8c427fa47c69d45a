use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use vidstash_core::models::Video;
use vidstash_core::AppError;

#[utoipa::path(
    get,
    path = "/video",
    tag = "videos",
    responses(
        (status = 200, description = "All stored videos, possibly empty", body = Vec<Video>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let videos = state.videos.list().await.map_err(HttpAppError::from)?;
    Ok(Json(videos))
}

#[utoipa::path(
    get,
    path = "/video/{id}",
    tag = "videos",
    params(
        ("id" = i64, Path, description = "Video id")
    ),
    responses(
        (status = 200, description = "Video found", body = Video),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(video_id = %id, operation = "get_video"))]
pub async fn get_video(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state
        .videos
        .get(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

    Ok(Json(video))
}
