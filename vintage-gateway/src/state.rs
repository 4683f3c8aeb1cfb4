//! Shared application state.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use vintage_catalog::CatalogStore;
use vintage_core::config::{ChatSettings, CrawlerSettings};

use crate::providers::Provider;
use crate::session::SessionStore;

/// State shared by all request handlers.
///
/// Constructed once at startup; the catalog snapshot is mutated only by
/// crawl completion, sessions only through the session store.
pub struct AppState {
    /// Current catalog, single source of truth.
    pub catalog: Arc<CatalogStore>,
    /// Conversation sessions.
    pub sessions: SessionStore,
    /// Text-generation backend; `None` means every reply is the
    /// fallback message.
    pub provider: Option<Arc<dyn Provider>>,
    /// Crawler configuration for the administrative trigger.
    pub crawler: CrawlerSettings,
    /// Retrieval and history settings.
    pub chat: ChatSettings,
    /// Serializes concurrent crawl triggers: two runs must not race on
    /// the durable catalog file.
    crawl_lock: Mutex<()>,
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogStore>,
        sessions: SessionStore,
        provider: Option<Arc<dyn Provider>>,
        crawler: CrawlerSettings,
        chat: ChatSettings,
    ) -> Self {
        Self {
            catalog,
            sessions,
            provider,
            crawler,
            chat,
            crawl_lock: Mutex::new(()),
        }
    }

    /// Held for the duration of a crawl trigger.
    pub async fn crawl_guard(&self) -> MutexGuard<'_, ()> {
        self.crawl_lock.lock().await
    }
}
