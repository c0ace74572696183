//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{BackendClient, BackendError};
use crate::config::DashboardConfig;
use crate::edit::RowWriteLocks;
use crate::fetch::FetchCache;
use crate::sdk::SdkBootstrap;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The fetch cache inside it is
/// the single response cache for every section and every session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    backend: BackendClient,
    cache: FetchCache,
    sdk: SdkBootstrap,
    role_writes: Arc<RowWriteLocks>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: DashboardConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config.backend)?;
        let cache = FetchCache::new(backend.clone(), config.cache);
        let sdk = SdkBootstrap::new(config.sdk_url);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                backend,
                cache,
                sdk,
                role_writes: Arc::new(RowWriteLocks::default()),
            }),
        })
    }

    /// Get a reference to the backend client (for writes).
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the shared response cache (for reads).
    #[must_use]
    pub fn cache(&self) -> &FetchCache {
        &self.inner.cache
    }

    /// Get a reference to the SDK bootstrap.
    #[must_use]
    pub fn sdk(&self) -> &SdkBootstrap {
        &self.inner.sdk
    }

    /// Per-row locks serialising role writes.
    #[must_use]
    pub fn role_writes(&self) -> &Arc<RowWriteLocks> {
        &self.inner.role_writes
    }
}
