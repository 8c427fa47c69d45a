//! OpenAPI document assembly.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use vidstash_core::models::{NewVideo, Video, VideoState};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::video_get::list_videos,
        crate::handlers::video_get::get_video,
        crate::handlers::video_create::create_video,
        crate::handlers::video_data::upload_video_data,
        crate::handlers::video_data::download_video_data,
        crate::handlers::video_likes::like_video,
        crate::handlers::video_likes::unlike_video,
        crate::handlers::video_likes::get_liked_by,
        crate::handlers::video_search::find_by_name,
        crate::handlers::video_search::find_by_duration_less_than,
    ),
    components(schemas(Video, NewVideo, VideoState, ErrorResponse)),
    tags(
        (name = "videos", description = "Video metadata and binary payloads"),
        (name = "likes", description = "Like/unlike interactions"),
        (name = "search", description = "Field search over stored videos")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
