//! Route modules for the Passport OCR server

pub mod health;
pub mod upload;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    // Any origin may call the API; there is no authentication
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config().server.max_upload_bytes;

    Router::new()
        .merge(health::router())
        .merge(upload::router().layer(DefaultBodyLimit::max(body_limit)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
