//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use vidstash_core::Config;

/// Assemble the application router with all middleware layers applied.
pub fn build_router(state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(&state.config)?;
    let max_body_bytes = state.config.max_data_size_bytes;

    // Server-level concurrency limit to protect against resource exhaustion
    // under extreme load.
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);

    let rapidoc: Router = utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
        .path("/docs")
        .into();

    let app = Router::new()
        .merge(video_routes(state.clone()))
        .merge(like_routes(state.clone()))
        .merge(search_routes(state.clone()))
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(rapidoc)
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware));

    Ok(app)
}

fn video_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/video",
            get(handlers::video_get::list_videos).post(handlers::video_create::create_video),
        )
        .route("/video/{id}", get(handlers::video_get::get_video))
        .route(
            "/video/{id}/data",
            post(handlers::video_data::upload_video_data)
                .get(handlers::video_data::download_video_data),
        )
        .with_state(state)
}

fn like_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/video/{id}/like", post(handlers::video_likes::like_video))
        .route(
            "/video/{id}/unlike",
            post(handlers::video_likes::unlike_video),
        )
        .route(
            "/video/{id}/likedby",
            get(handlers::video_likes::get_liked_by),
        )
        .with_state(state)
}

fn search_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/video/search/findByName",
            get(handlers::video_search::find_by_name),
        )
        .route(
            "/video/search/findByDurationLessThan",
            get(handlers::video_search::find_by_duration_less_than),
        )
        .with_state(state)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();
        CorsLayer::new()
            .allow_origin(origins.map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    };

    Ok(cors)
}
