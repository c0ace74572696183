//! Per-resource cache and fetch states.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use moka::future::Cache;
use thiserror::Error;

use super::FetchKey;
use crate::backend::BackendError;
use crate::config::CacheConfig;

/// A failed fetch, shared by every caller that waited on it.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct FetchError(Arc<BackendError>);

impl FetchError {
    /// HTTP status reported by the backend, if it answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.0.status()
    }

    /// Backend message for API errors, the error text otherwise.
    #[must_use]
    pub fn message(&self) -> String {
        match self.0.as_ref() {
            BackendError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<BackendError> for FetchError {
    fn from(e: BackendError) -> Self {
        Self(Arc::new(e))
    }
}

/// Observable state of one cache key.
#[derive(Debug)]
pub enum FetchState<T> {
    /// No session token; nothing was requested.
    Idle,
    /// Not in the cache yet.
    Loading,
    /// Last successful response.
    Ready(Arc<T>),
    /// Last attempt failed.
    Failed(FetchError),
}

impl<T> FetchState<T> {
    #[must_use]
    pub fn data(&self) -> Option<&Arc<T>> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl<T> Clone for FetchState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Loading => Self::Loading,
            Self::Ready(data) => Self::Ready(Arc::clone(data)),
            Self::Failed(e) => Self::Failed(e.clone()),
        }
    }
}

/// Attempts a load makes before giving up on a consistent result.
const MAX_LOAD_ATTEMPTS: usize = 3;

/// A cached response and the session generation it was fetched under.
struct Stamped<T> {
    generation: u64,
    value: Arc<T>,
}

/// Cache of one resource's responses.
///
/// Each session has a generation that [`invalidate_context`] bumps. A load
/// records the generation it started under, and entries from an older
/// generation are never served, so a fetch that was already running when a
/// write invalidated its session cannot resurrect pre-write data.
///
/// [`invalidate_context`]: ResourceCache::invalidate_context
pub struct ResourceCache<T> {
    cache: Cache<FetchKey, Arc<Stamped<T>>>,
    generations: Mutex<HashMap<String, u64>>,
}

impl<T: Send + Sync + 'static> ResourceCache<T> {
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);
        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            cache: builder.build(),
            generations: Mutex::new(HashMap::new()),
        }
    }

    fn generation(&self, context: &str) -> u64 {
        self.generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(context)
            .copied()
            .unwrap_or_default()
    }

    /// Current state of `key` without fetching: `Ready` on a hit,
    /// `Loading` on a miss.
    pub async fn peek(&self, key: &FetchKey) -> FetchState<T> {
        match self.cache.get(key).await {
            Some(entry) if entry.generation == self.generation(&key.context) => {
                FetchState::Ready(Arc::clone(&entry.value))
            }
            _ => FetchState::Loading,
        }
    }

    /// Return the cached value for `key`, calling `fetch` on a miss.
    ///
    /// Concurrent calls for the same key await a single fetch. Errors are
    /// handed to every waiter but never stored. A result whose session was
    /// invalidated while it was in flight is dropped and fetched again.
    pub async fn load<F, Fut>(&self, key: FetchKey, fetch: F) -> FetchState<T>
    where
        F: Fn(FetchKey) -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        for _ in 0..MAX_LOAD_ATTEMPTS {
            let init = async {
                let generation = self.generation(&key.context);
                let value = fetch(key.clone()).await?;
                Ok::<_, BackendError>(Arc::new(Stamped {
                    generation,
                    value: Arc::new(value),
                }))
            };

            match self.cache.try_get_with(key.clone(), init).await {
                Err(e) => return FetchState::Failed(FetchError(e)),
                Ok(entry) if entry.generation == self.generation(&key.context) => {
                    return FetchState::Ready(Arc::clone(&entry.value));
                }
                Ok(_) => self.cache.invalidate(&key).await,
            }
        }

        tracing::debug!(resource = ?key.resource, "Session kept changing during load");
        FetchState::Loading
    }

    /// Drop every entry belonging to one session, including loads still in
    /// flight.
    pub async fn invalidate_context(&self, context: &str) {
        *self
            .generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(context.to_string())
            .or_default() += 1;

        let stale: Vec<Arc<FetchKey>> = self
            .cache
            .iter()
            .filter(|(key, _)| key.context == context)
            .map(|(key, _)| key)
            .collect();

        for key in stale {
            self.cache.invalidate(key.as_ref()).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::fetch::Resource;
    use crate::middleware::SessionToken;
    use crate::sections::{INVENTORY_PAGE_SIZES, ListQuery};

    fn key(context: &str, page: u32) -> FetchKey {
        let query = ListQuery::new(&INVENTORY_PAGE_SIZES).with_page(page);
        FetchKey::list(Resource::Variants, &SessionToken::new(context), &query).unwrap()
    }

    fn cache() -> ResourceCache<u32> {
        ResourceCache::new(&CacheConfig::default())
    }

    fn value(state: &FetchState<u32>) -> Option<u32> {
        state.data().map(|d| **d)
    }

    #[tokio::test]
    async fn test_peek_miss_is_loading() {
        assert!(cache().peek(&key("a", 1)).await.is_loading());
    }

    #[tokio::test]
    async fn test_load_caches_success() {
        let cache = cache();
        let calls = &AtomicU32::new(0);
        let fetch = move |_| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        };

        for _ in 0..3 {
            assert_eq!(value(&cache.load(key("a", 1), fetch).await), Some(7));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(value(&cache.peek(&key("a", 1)).await), Some(7));
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_fetch() {
        let cache = cache();
        let calls = &AtomicU32::new(0);
        let fetch = move |_| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(1)
        };

        let (a, b, c) = tokio::join!(
            cache.load(key("a", 1), fetch),
            cache.load(key("a", 1), fetch),
            cache.load(key("a", 1), fetch),
        );

        assert!(a.data().is_some() && b.data().is_some() && c.data().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = cache();
        let failed = cache
            .load(key("a", 1), |_| async {
                Err(BackendError::Api {
                    status: 403,
                    message: "Forbidden".to_string(),
                })
            })
            .await;

        let error = failed.error().unwrap();
        assert_eq!(error.status(), Some(403));
        assert_eq!(error.message(), "Forbidden");
        assert!(cache.peek(&key("a", 1)).await.is_loading());

        let retried = cache.load(key("a", 1), |_| async { Ok(2) }).await;
        assert_eq!(value(&retried), Some(2));
    }

    #[tokio::test]
    async fn test_invalidate_context_keeps_other_sessions() {
        let cache = cache();
        cache.load(key("a", 1), |_| async { Ok(1) }).await;
        cache.load(key("a", 2), |_| async { Ok(2) }).await;
        cache.load(key("b", 1), |_| async { Ok(3) }).await;

        cache.invalidate_context("a").await;

        assert!(cache.peek(&key("a", 1)).await.is_loading());
        assert!(cache.peek(&key("a", 2)).await.is_loading());
        assert_eq!(value(&cache.peek(&key("b", 1)).await), Some(3));

        let state = cache.load(key("a", 1), |_| async { Ok(4) }).await;
        assert_eq!(value(&state), Some(4));
    }

    #[tokio::test]
    async fn test_invalidation_during_load_discards_result() {
        let cache = cache();
        let calls = &AtomicU32::new(0);
        // The first fetch is slow and returns pre-write data (1).
        let fetch = move |_| async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            Ok(n + 1)
        };
        let write = async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            cache.invalidate_context("a").await;
        };

        let (state, ()) = tokio::join!(cache.load(key("a", 1), fetch), write);

        assert_eq!(value(&state), Some(2));
        assert_eq!(value(&cache.peek(&key("a", 1)).await), Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_read_after_invalidation_skips_inflight_result() {
        let cache = cache();
        let calls = &AtomicU32::new(0);
        let fetch = move |_| async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            Ok(n + 1)
        };
        let reread = async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            cache.invalidate_context("a").await;
            cache.load(key("a", 1), fetch).await
        };

        let (first, after_write) = tokio::join!(cache.load(key("a", 1), fetch), reread);

        assert!(value(&after_write).is_some_and(|v| v >= 2));
        assert!(value(&first).is_some_and(|v| v >= 2));
        assert!(value(&cache.peek(&key("a", 1)).await).is_some_and(|v| v >= 2));
    }

    #[tokio::test]
    async fn test_peek_hides_entries_from_before_invalidation() {
        let cache = cache();
        cache.load(key("a", 1), |_| async { Ok(1) }).await;
        cache.invalidate_context("a").await;

        assert!(cache.peek(&key("a", 1)).await.is_loading());
    }
}
