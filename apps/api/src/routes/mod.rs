use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers::handle_analyze;
use crate::report::handlers::{handle_generate_report, handle_latest_report};
use crate::selections::handle_save_selections;
use crate::state::AppState;

mod health;

/// Standards PDFs run to hundreds of pages.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/analyze", post(handle_analyze))
        .route("/api/v1/selections", post(handle_save_selections))
        .route("/api/v1/reports", post(handle_generate_report))
        .route("/api/v1/reports/latest", get(handle_latest_report))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
