use std::sync::Arc;

use crate::config::Config;
use crate::providers::AnalysisProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Selected once at startup from `PROVIDER` and the available API keys.
    pub provider: Arc<dyn AnalysisProvider>,
}
