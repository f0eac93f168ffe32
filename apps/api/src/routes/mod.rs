pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;
use crate::usage::handlers as usage;

/// Room for multipart boundaries and the text fields around the uploaded file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume text API
        .route("/api/v1/resume/sections", post(resume::handle_sections))
        .route("/api/v1/resume/export", post(resume::handle_export))
        // Tailoring
        .route(
            "/api/v1/process",
            post(tailoring::handle_process).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Usage quota
        .route("/api/v1/usage", get(usage::handle_get_usage))
        .route("/api/v1/usage/purchase", post(usage::handle_purchase))
        .with_state(state)
}
