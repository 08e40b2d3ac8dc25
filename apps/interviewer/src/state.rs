use std::sync::Arc;

use crate::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Immutable once built; concurrent requests each run their own pipeline.
    pub pipeline: Arc<Pipeline>,
}
