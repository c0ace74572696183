//! Shared response cache for backend reads.
//!
//! # Architecture
//!
//! - One `moka` cache per resource, keyed by [`FetchKey`]
//!   (resource, session token, page, limit, filter)
//! - Concurrent loads of the same key share one backend request
//!   (`try_get_with`); failures are returned to every waiter and not cached
//! - Entries stay valid until invalidated (optionally bounded by a TTL)
//! - No request is ever made without a session token
//!
//! # Example
//!
//! ```rust,ignore
//! let state = cache.variants(&session, &query).await;
//! if let Some(page) = state.data() {
//!     render(page);
//! }
//! ```

mod key;
mod resource;

pub use key::{FetchKey, Resource};
pub use resource::{FetchError, FetchState, ResourceCache};

use std::sync::Arc;

use storeroom_core::{Page, StoreUser, Variant};

use crate::backend::{BackendClient, Permissions};
use crate::config::CacheConfig;
use crate::middleware::SessionToken;
use crate::sections::ListQuery;

/// Response cache shared by every section and every session.
#[derive(Clone)]
pub struct FetchCache {
    inner: Arc<FetchCacheInner>,
}

struct FetchCacheInner {
    backend: BackendClient,
    permissions: ResourceCache<Permissions>,
    users: ResourceCache<Page<StoreUser>>,
    variants: ResourceCache<Page<Variant>>,
}

impl FetchCache {
    /// Create an empty cache reading through `backend`.
    #[must_use]
    pub fn new(backend: BackendClient, config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(FetchCacheInner {
                backend,
                permissions: ResourceCache::new(&config),
                users: ResourceCache::new(&config),
                variants: ResourceCache::new(&config),
            }),
        }
    }

    // =========================================================================
    // Permissions
    // =========================================================================

    /// Cached permissions of the acting user, without network I/O.
    pub async fn permissions_state(&self, session: &SessionToken) -> FetchState<Permissions> {
        match FetchKey::permissions(session) {
            Some(key) => self.inner.permissions.peek(&key).await,
            None => FetchState::Idle,
        }
    }

    /// Permissions of the acting user, fetched on a cache miss.
    pub async fn permissions(&self, session: &SessionToken) -> FetchState<Permissions> {
        let Some(key) = FetchKey::permissions(session) else {
            return FetchState::Idle;
        };
        let backend = &self.inner.backend;
        let fetch =
            move |key: FetchKey| async move { backend.get_permissions(&key.context).await };
        self.inner.permissions.load(key, fetch).await
    }

    // =========================================================================
    // Store users
    // =========================================================================

    /// Cached users page, without network I/O.
    pub async fn users_state(
        &self,
        session: &SessionToken,
        query: &ListQuery,
    ) -> FetchState<Page<StoreUser>> {
        match FetchKey::list(Resource::Users, session, query) {
            Some(key) => self.inner.users.peek(&key).await,
            None => FetchState::Idle,
        }
    }

    /// Users page, fetched on a cache miss.
    pub async fn users(
        &self,
        session: &SessionToken,
        query: &ListQuery,
    ) -> FetchState<Page<StoreUser>> {
        let Some(key) = FetchKey::list(Resource::Users, session, query) else {
            return FetchState::Idle;
        };
        let backend = &self.inner.backend;
        let fetch = move |key: FetchKey| async move {
            backend
                .list_users(&key.context, key.page, key.limit, &key.filter)
                .await
        };
        self.inner.users.load(key, fetch).await
    }

    /// Warm the users cache for `query` in the background.
    pub fn prefetch_users(&self, session: &SessionToken, query: ListQuery) {
        let cache = self.clone();
        let session = session.clone();
        tokio::spawn(async move {
            if let FetchState::Failed(e) = cache.users(&session, &query).await {
                tracing::debug!(page = query.page, error = %e, "Users prefetch failed");
            }
        });
    }

    // =========================================================================
    // Variants
    // =========================================================================

    /// Cached variants page, without network I/O.
    pub async fn variants_state(
        &self,
        session: &SessionToken,
        query: &ListQuery,
    ) -> FetchState<Page<Variant>> {
        match FetchKey::list(Resource::Variants, session, query) {
            Some(key) => self.inner.variants.peek(&key).await,
            None => FetchState::Idle,
        }
    }

    /// Variants page, fetched on a cache miss.
    pub async fn variants(
        &self,
        session: &SessionToken,
        query: &ListQuery,
    ) -> FetchState<Page<Variant>> {
        let Some(key) = FetchKey::list(Resource::Variants, session, query) else {
            return FetchState::Idle;
        };
        let backend = &self.inner.backend;
        let fetch = move |key: FetchKey| async move {
            backend
                .list_variants(&key.context, key.page, key.limit, &key.filter)
                .await
        };
        self.inner.variants.load(key, fetch).await
    }

    /// Warm the variants cache for `query` in the background.
    pub fn prefetch_variants(&self, session: &SessionToken, query: ListQuery) {
        let cache = self.clone();
        let session = session.clone();
        tokio::spawn(async move {
            if let FetchState::Failed(e) = cache.variants(&session, &query).await {
                tracing::debug!(page = query.page, error = %e, "Variants prefetch failed");
            }
        });
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    /// Drop every users page of one session.
    pub async fn invalidate_users(&self, session: &SessionToken) {
        self.inner.users.invalidate_context(session.expose()).await;
    }

    /// Drop every variants page of one session.
    pub async fn invalidate_variants(&self, session: &SessionToken) {
        self.inner.variants.invalidate_context(session.expose()).await;
    }
}
