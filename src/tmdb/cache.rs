use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::TmdbError;

/// Response bodies keyed by request URL.
///
/// Concurrent lookups of the same URL share a single upstream request.
/// Only successful bodies are stored.
#[derive(Clone)]
pub struct ResponseCache {
    bodies: Cache<String, Arc<String>>,
}

impl ResponseCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let bodies = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { bodies }
    }

    pub async fn get_or_fetch<F>(&self, url: &str, fetch: F) -> Result<Arc<String>, TmdbError>
    where
        F: Future<Output = Result<String, TmdbError>>,
    {
        self.bodies
            .try_get_with(url.to_string(), async move { fetch.await.map(Arc::new) })
            .await
            .map_err(|e| (*e).clone())
    }
}
