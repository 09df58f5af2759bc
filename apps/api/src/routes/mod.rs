pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::catalog::handlers::handle_list_chars;
use crate::errors::AppError;
use crate::print::handlers::handle_print;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/chars", get(handle_list_chars))
        .route("/print", post(handle_print))
        .fallback(not_found)
        .with_state(state)
}
