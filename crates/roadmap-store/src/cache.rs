//! Memoized store connections using moka
//!
//! One handle per URI, shared across the process:
//! - Concurrent first callers wait on a single in-flight connect attempt
//! - A failed attempt is not cached, so the next caller retries
//! - `invalidate` drops a handle after the caller sees it go bad

use crate::error::StoreError;
use async_trait::async_trait;
use moka::future::Cache;
use std::fmt;
use std::sync::Arc;

/// Opens connections to a backing store
#[async_trait]
pub trait Connect: Send + Sync + 'static {
    /// Shared connection handle
    type Handle: Clone + Send + Sync + 'static;

    /// Open a new connection to `uri`
    async fn connect(&self, uri: &str) -> Result<Self::Handle, StoreError>;
}

/// Connection cache keyed by URI
pub struct ConnectionCache<C: Connect> {
    connector: Arc<C>,
    handles: Cache<String, C::Handle>,
}

impl<C: Connect> Clone for ConnectionCache<C> {
    fn clone(&self) -> Self {
        Self {
            connector: Arc::clone(&self.connector),
            handles: self.handles.clone(),
        }
    }
}

impl<C: Connect> fmt::Debug for ConnectionCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionCache")
            .field("entry_count", &self.handles.entry_count())
            .finish_non_exhaustive()
    }
}

impl<C: Connect> ConnectionCache<C> {
    /// Create cache over a connector
    #[inline]
    #[must_use]
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            handles: Cache::new(64),
        }
    }

    /// Handle for `uri`, connecting on first use
    ///
    /// # Errors
    /// The connector's error when the attempt this caller waited on failed.
    pub async fn get(&self, uri: &str) -> Result<C::Handle, StoreError> {
        let connector = Arc::clone(&self.connector);
        let target = uri.to_string();
        self.handles
            .try_get_with(uri.to_string(), async move {
                tracing::info!(uri = %target, "connecting to store");
                let result = connector.connect(&target).await;
                if let Err(err) = &result {
                    tracing::warn!(uri = %target, error = %err, "store connection failed");
                }
                result
            })
            .await
            .map_err(|err| (*err).clone())
    }

    /// Drop the cached handle for `uri`
    pub async fn invalidate(&self, uri: &str) {
        tracing::debug!(uri, "invalidating store connection");
        self.handles.invalidate(uri).await;
    }

    /// Whether a handle for `uri` is currently cached
    #[must_use]
    pub async fn contains(&self, uri: &str) -> bool {
        self.handles.get(uri).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::task::JoinSet;

    /// Counts attempts; fails the first `failures` of them
    #[derive(Default)]
    struct CountingConnector {
        attempts: AtomicUsize,
        failures: usize,
    }

    #[async_trait]
    impl Connect for Arc<CountingConnector> {
        type Handle = Arc<String>;

        async fn connect(&self, uri: &str) -> Result<Self::Handle, StoreError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            if attempt < self.failures {
                return Err(StoreError::connection(uri, "refused"));
            }
            Ok(Arc::new(format!("{uri}#{attempt}")))
        }
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_attempt() {
        let connector = Arc::new(CountingConnector::default());
        let cache = ConnectionCache::new(Arc::clone(&connector));

        let mut tasks = JoinSet::new();
        for _ in 0..8 {
            let cache = cache.clone();
            tasks.spawn(async move { cache.get("mem://main").await });
        }
        while let Some(joined) = tasks.join_next().await {
            assert_eq!(joined.unwrap().unwrap().as_str(), "mem://main#0");
        }
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_attempt_is_not_cached() {
        let connector = Arc::new(CountingConnector {
            failures: 1,
            ..CountingConnector::default()
        });
        let cache = ConnectionCache::new(Arc::clone(&connector));

        let err = cache.get("mem://main").await.unwrap_err();
        assert_eq!(err, StoreError::connection("mem://main", "refused"));
        assert!(!cache.contains("mem://main").await);

        let handle = cache.get("mem://main").await.unwrap();
        assert_eq!(handle.as_str(), "mem://main#1");
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_reconnect() {
        let connector = Arc::new(CountingConnector::default());
        let cache = ConnectionCache::new(Arc::clone(&connector));

        cache.get("mem://a").await.unwrap();
        cache.get("mem://a").await.unwrap();
        cache.invalidate("mem://a").await;
        let handle = cache.get("mem://a").await.unwrap();

        assert_eq!(handle.as_str(), "mem://a#1");
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn uris_are_cached_independently() {
        let connector = Arc::new(CountingConnector::default());
        let cache = ConnectionCache::new(Arc::clone(&connector));

        let a = cache.get("mem://a").await.unwrap();
        let b = cache.get("mem://b").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 2);
    }
}
