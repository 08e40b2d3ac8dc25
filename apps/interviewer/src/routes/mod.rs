pub mod health;
pub mod interviews;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/interviews",
            post(interviews::handle_create_interview),
        )
        .route(
            "/api/v1/interviews/upload",
            post(interviews::handle_upload_interview),
        )
        .with_state(state)
}
