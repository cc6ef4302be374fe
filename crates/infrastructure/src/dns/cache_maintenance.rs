use super::cache::ResponseCache;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use wildcard_dns_application::ports::{CacheMaintenancePort, CacheSweepOutcome};
use wildcard_dns_domain::DomainError;

/// Infrastructure adapter implementing `CacheMaintenancePort`.
pub struct ResponseCacheMaintenance {
    cache: Arc<ResponseCache>,
}

impl ResponseCacheMaintenance {
    pub fn new(cache: Arc<ResponseCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl CacheMaintenancePort for ResponseCacheMaintenance {
    async fn run_sweep_cycle(&self) -> Result<CacheSweepOutcome, DomainError> {
        let entries_removed = self.cache.sweep();
        let cache_size = self.cache.len();

        let snapshot = self.cache.metrics_snapshot();
        debug!(
            entries_removed,
            cache_size,
            hits = snapshot.hits,
            misses = snapshot.misses,
            hit_rate = snapshot.hit_rate,
            "Cache sweep finished"
        );

        Ok(CacheSweepOutcome {
            entries_removed,
            cache_size,
        })
    }
}
