use std::pin::Pin;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use vidstash_core::models::VideoState;
use vidstash_core::AppError;

/// Pull the single `data` field out of the multipart form.
/// Returns the payload plus the content type the client declared, if any.
async fn extract_data_field(
    mut multipart: Multipart,
) -> Result<(Bytes, Option<String>), AppError> {
    let mut payload: Option<(Bytes, Option<String>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "data" {
            if payload.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple data fields are not allowed; send exactly one field named 'data'"
                        .to_string(),
                ));
            }
            let content_type = field.content_type().map(|s: &str| s.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read data field: {}", e)))?;
            payload = Some((bytes, content_type));
        }
    }

    payload.ok_or_else(|| AppError::InvalidInput("No 'data' field provided".to_string()))
}

#[utoipa::path(
    post,
    path = "/video/{id}/data",
    tag = "videos",
    params(
        ("id" = i64, Path, description = "Video id")
    ),
    responses(
        (status = 200, description = "Payload accepted, video is ready", body = VideoState),
        (status = 400, description = "Missing or malformed data field", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(video_id = %id, operation = "upload_video_data"))]
pub async fn upload_video_data(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    // The upload must never create a record; unknown ids are rejected before
    // any bytes are consumed from the sink's point of view.
    let video = state
        .videos
        .get(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

    let (bytes, field_content_type) = extract_data_field(multipart).await?;
    let content_type = field_content_type.unwrap_or_else(|| video.content_type.clone());

    let reader: Pin<Box<dyn AsyncRead + Send + Unpin>> = Box::pin(std::io::Cursor::new(bytes));
    let written = state
        .data
        .save(id, &content_type, reader)
        .await
        .map_err(HttpAppError::from)?;

    let updated = state
        .videos
        .set_state(id, VideoState::Ready)
        .await
        .map_err(HttpAppError::from)?;

    tracing::info!(video_id = id, bytes = written, "Accepted video data");
    Ok(Json(updated.state))
}

#[utoipa::path(
    get,
    path = "/video/{id}/data",
    tag = "videos",
    params(
        ("id" = i64, Path, description = "Video id")
    ),
    responses(
        (status = 200, description = "Raw payload bytes with the stored content type"),
        (status = 404, description = "Video not found or no data uploaded yet", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn download_video_data(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, HttpAppError> {
    state
        .videos
        .get(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

    let object = state.data.load(id).await.map_err(HttpAppError::from)?;

    Ok((
        [(header::CONTENT_TYPE, object.content_type)],
        object.bytes,
    )
        .into_response())
}
