//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! catalog is read-only after startup, so no locks are needed. The graph is
//! recomputed per request from the catalog and the layout constants.

use std::sync::Arc;

use crate::config::DEFAULT_CLASSIFY_MAX_TOKENS;
use crate::graph::LayoutConfig;
use crate::llm::LlmChat;
use crate::prompts::Catalog;

/// Clone is required by Axum; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub layout: LayoutConfig,
    /// Optional LLM client. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    pub classify_max_tokens: u32,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: Catalog, llm: Option<Arc<dyn LlmChat>>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            layout: LayoutConfig::default(),
            llm,
            classify_max_tokens: DEFAULT_CLASSIFY_MAX_TOKENS,
        }
    }

    #[must_use]
    pub fn with_classify_max_tokens(mut self, max_tokens: u32) -> Self {
        self.classify_max_tokens = max_tokens;
        self
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
