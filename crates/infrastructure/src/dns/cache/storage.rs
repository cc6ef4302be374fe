use super::{CacheMetrics, CacheMetricsSnapshot, CachedResponse};
use dashmap::DashMap;
use hickory_proto::op::Message;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use wildcard_dns_application::ports::ResponseCachePort;
use wildcard_dns_domain::QuestionKey;

/// Concurrent question-keyed response cache with fixed expiration.
///
/// Every `set` restarts the entry's lifetime; reads never extend it. Expired
/// entries are dropped lazily on lookup and in bulk by [`ResponseCache::sweep`].
/// Two concurrent misses on one key are not merged: both writers land and the
/// last one wins.
pub struct ResponseCache {
    entries: DashMap<QuestionKey, CachedResponse, FxBuildHasher>,
    ttl: Duration,
    metrics: CacheMetrics,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        info!(ttl_secs = ttl.as_secs_f64(), "Initializing response cache");

        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            ttl,
            metrics: CacheMetrics::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &QuestionKey) -> Option<Arc<Message>> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired_at(now) {
                self.metrics.hits.fetch_add(1, AtomicOrdering::Relaxed);
                return Some(Arc::clone(&entry.response));
            }
            // The read guard holds the shard lock; release it before removing.
            drop(entry);

            // A concurrent `set` may have refreshed the entry in between.
            if self
                .entries
                .remove_if(key, |_, cached| cached.is_expired_at(now))
                .is_some()
            {
                self.metrics.expirations.fetch_add(1, AtomicOrdering::Relaxed);
                debug!(question = %key, "Expired cache entry removed on lookup");
            }
        }

        self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
        None
    }

    pub fn set(&self, key: QuestionKey, response: Arc<Message>) {
        debug!(question = %key, answers = response.answers().len(), "Caching response");
        self.entries
            .insert(key, CachedResponse::new(response, self.ttl));
        self.metrics.insertions.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Drop every entry whose expiration has passed. Returns how many went.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0usize;

        self.entries.retain(|_, cached| {
            let keep = !cached.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        self.metrics.sweeps.fetch_add(1, AtomicOrdering::Relaxed);
        self.metrics
            .expirations
            .fetch_add(removed as u64, AtomicOrdering::Relaxed);

        removed
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.entries.len())
    }
}

impl ResponseCachePort for ResponseCache {
    fn get(&self, key: &QuestionKey) -> Option<Arc<Message>> {
        ResponseCache::get(self, key)
    }

    fn set(&self, key: QuestionKey, response: Arc<Message>) {
        ResponseCache::set(self, key, response)
    }

    fn cache_size(&self) -> usize {
        self.len()
    }
}
