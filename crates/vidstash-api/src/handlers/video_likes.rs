use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::error::{ErrorResponse, HttpAppError};
use crate::identity::UserIdentity;
use crate::state::AppState;
use vidstash_core::models::Video;
use vidstash_core::AppError;

#[utoipa::path(
    post,
    path = "/video/{id}/like",
    tag = "likes",
    params(
        ("id" = i64, Path, description = "Video id")
    ),
    responses(
        (status = 200, description = "Like recorded, updated video returned", body = Video),
        (status = 400, description = "Video already liked by this user", body = ErrorResponse),
        (status = 401, description = "Missing user identity", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(video_id = %id, user = %user.0, operation = "like_video"))]
pub async fn like_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    user: UserIdentity,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state
        .videos
        .like(id, &user.0)
        .await
        .map_err(HttpAppError::from)?;

    tracing::info!(video_id = id, likes = video.likes, "Video liked");
    Ok(Json(video))
}

#[utoipa::path(
    post,
    path = "/video/{id}/unlike",
    tag = "likes",
    params(
        ("id" = i64, Path, description = "Video id")
    ),
    responses(
        (status = 200, description = "Like removed, updated video returned", body = Video),
        (status = 400, description = "Video was not liked by this user", body = ErrorResponse),
        (status = 401, description = "Missing user identity", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(video_id = %id, user = %user.0, operation = "unlike_video"))]
pub async fn unlike_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    user: UserIdentity,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state
        .videos
        .unlike(id, &user.0)
        .await
        .map_err(HttpAppError::from)?;

    tracing::info!(video_id = id, likes = video.likes, "Video unliked");
    Ok(Json(video))
}

#[utoipa::path(
    get,
    path = "/video/{id}/likedby",
    tag = "likes",
    params(
        ("id" = i64, Path, description = "Video id")
    ),
    responses(
        (status = 200, description = "User ids that like this video", body = Vec<String>),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_liked_by(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    let likers = state
        .videos
        .liked_by(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

    Ok(Json(likers))
}
