use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use vidstash_core::models::Video;

#[derive(Debug, Deserialize, IntoParams)]
pub struct TitleQuery {
    pub title: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DurationQuery {
    pub duration: i64,
}

#[utoipa::path(
    get,
    path = "/video/search/findByName",
    tag = "search",
    params(TitleQuery),
    responses(
        (status = 200, description = "Videos whose title matches exactly, possibly empty", body = Vec<Video>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn find_by_name(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TitleQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let videos = state
        .videos
        .find_by_name(&params.title)
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(videos))
}

#[utoipa::path(
    get,
    path = "/video/search/findByDurationLessThan",
    tag = "search",
    params(DurationQuery),
    responses(
        (status = 200, description = "Videos strictly shorter than the bound, possibly empty", body = Vec<Video>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn find_by_duration_less_than(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DurationQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let videos = state
        .videos
        .find_by_duration_less_than(params.duration)
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(videos))
}
