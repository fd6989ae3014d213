//! Application state for the chat server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::index::{IndexManager, RetrievalBackend};
use crate::query::QueryService;
use crate::session::{session_store, ChatSessionStore};
use crate::storage::ContentStore;

use super::page::PageRenderer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Content directory
    store: ContentStore,
    /// Live index owner
    index: Arc<IndexManager>,
    /// Question answering over the live index
    query: QueryService,
    /// Per-browser sessions
    sessions: ChatSessionStore,
    /// Page template
    pages: PageRenderer,
}

impl AppState {
    /// Create new application state around a retrieval backend
    pub async fn new(config: RagConfig, backend: Arc<dyn RetrievalBackend>) -> Result<Self> {
        tracing::info!(
            "Initializing application state (backend: {}, data: {}, storage: {})",
            backend.name(),
            config.storage.data_dir.display(),
            config.storage.persist_dir.display()
        );

        let store = ContentStore::new(&config.storage.data_dir);
        let index = Arc::new(IndexManager::new(
            store.clone(),
            &config.storage.persist_dir,
            backend,
            config.index.stale_policy,
        ));
        let query = QueryService::new(index.clone());
        let pages = PageRenderer::new()?;
        let sessions = session_store(config.server.session_lifetime_mins).await?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                index,
                query,
                sessions,
                pages,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get content store
    pub fn store(&self) -> &ContentStore {
        &self.inner.store
    }

    /// Get index manager
    pub fn index(&self) -> &Arc<IndexManager> {
        &self.inner.index
    }

    /// Get query service
    pub fn query(&self) -> &QueryService {
        &self.inner.query
    }

    /// Get session store
    pub fn sessions(&self) -> &ChatSessionStore {
        &self.inner.sessions
    }

    /// Get page renderer
    pub fn pages(&self) -> &PageRenderer {
        &self.inner.pages
    }

    /// Check if a live index exists
    pub fn is_ready(&self) -> bool {
        self.inner.index.is_ready()
    }
}
