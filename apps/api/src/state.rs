use std::sync::Arc;

use crate::config::Config;
use crate::tailoring::pipeline::Tailor;
use crate::usage::UsageStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable tailoring backend. Default: LlmTailor over the Anthropic client.
    pub tailor: Arc<dyn Tailor>,
    /// Redis-backed when REDIS_URL is set, in-memory otherwise.
    pub usage: Arc<dyn UsageStore>,
}
