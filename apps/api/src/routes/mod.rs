pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::letter::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Letter API
        .route("/api/v1/letters", post(handlers::handle_generate_letter))
        .route(
            "/api/v1/letters/revise",
            post(handlers::handle_revise_letter),
        )
        .layer(body_limit)
        .with_state(state)
}
