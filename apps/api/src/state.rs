use std::sync::Arc;

use crate::ai::AiService;
use crate::config::Config;
use crate::storage::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup around the configured provider.
    pub ai: Arc<AiService>,
    /// Pluggable persistence. Default: FileResumeStore under DATA_DIR.
    pub store: Arc<dyn ResumeStore>,
    pub config: Arc<Config>,
}
