use axum::Router;

use crate::AppState;

mod auth;
mod error;
mod handlers;
mod pages;
mod routes;

pub use auth::Unauthorized;
pub use error::AppError;

/// Exact-path routes first; every other path is looked up as a media key.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::pages(&state.admin_path))
        .merge(routes::uploads(state.upload_max_bytes))
        .merge(routes::gallery_api())
        .fallback(handlers::serve_media)
        .with_state(state)
}
