use axum::extract::DefaultBodyLimit;
use axum::{routing::get, routing::post, Router};
use tower_http::limit::RequestBodyLimitLayer;

use crate::http::handlers;
use crate::AppState;

pub fn pages(admin_path: &str) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::landing).fallback(handlers::method_not_allowed),
        )
        .route(
            &format!("/{}", admin_path),
            get(handlers::gallery).fallback(handlers::method_not_allowed),
        )
}

pub fn uploads(upload_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(handlers::upload).fallback(handlers::method_not_allowed),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(upload_max_bytes))
}

pub fn gallery_api() -> Router<AppState> {
    Router::new()
        .route(
            "/bing-images",
            get(handlers::wallpapers).fallback(handlers::method_not_allowed),
        )
        .route(
            "/delete-images",
            post(handlers::delete_images).fallback(handlers::method_not_allowed),
        )
}
