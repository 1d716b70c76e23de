//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::WikimapConfig;
use crate::i18n::{Language, Translator};
use crate::services::{Dashboard, SessionStore};
use crate::sources::FullSource;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline bound to the configured source
    pub dashboard: Dashboard,
    pub sessions: SessionStore,
    pub translator: Arc<dyn Translator>,
    pub config: Arc<WikimapConfig>,
}

impl AppState {
    pub fn new(
        source: Arc<dyn FullSource>,
        translator: Arc<dyn Translator>,
        config: WikimapConfig,
    ) -> Self {
        Self {
            dashboard: Dashboard::from_config(source, &config),
            sessions: SessionStore::new(),
            translator,
            config: Arc::new(config),
        }
    }

    pub fn source(&self) -> &Arc<dyn FullSource> {
        self.dashboard.store().source()
    }

    pub fn default_language(&self) -> Language {
        self.config.wiki.language
    }
}
