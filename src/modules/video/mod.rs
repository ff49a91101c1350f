use crate::media::policy::{THUMBNAIL_POLICY, VIDEO_POLICY};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::put;
use axum::Router;

pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/upload",
            put(handler::upload_video).layer(DefaultBodyLimit::max(VIDEO_POLICY.body_limit())),
        )
        .route(
            "/{id}/thumbnail",
            put(handler::upload_thumbnail)
                .layer(DefaultBodyLimit::max(THUMBNAIL_POLICY.body_limit())),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::auth_middleware,
        ))
}
