use counsel_llm::CompletionClient;
use counsel_prompt::PromptCatalog;
use std::sync::Arc;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// Everything here is read-only after startup: the configuration, the
/// persona catalog, and the completion client (a connection pool only,
/// credentials travel with each request).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<PromptCatalog>,
    pub llm: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(config: Config, llm: Arc<dyn CompletionClient>) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(PromptCatalog::new()),
            llm,
        }
    }
}
