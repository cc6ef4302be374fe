use async_trait::async_trait;
use wildcard_dns_domain::DomainError;

/// Outcome of a cache sweep cycle.
#[derive(Debug, Default, Clone)]
pub struct CacheSweepOutcome {
    pub entries_removed: usize,
    pub cache_size: usize,
}

/// Port for periodic cache upkeep, independent of request traffic.
#[async_trait]
pub trait CacheMaintenancePort: Send + Sync {
    /// Remove every expired entry to reclaim memory.
    async fn run_sweep_cycle(&self) -> Result<CacheSweepOutcome, DomainError>;
}
