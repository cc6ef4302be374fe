use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use wildcard_dns_application::ports::CacheMaintenancePort;
use wildcard_dns_application::services::WildcardMatcher;
use wildcard_dns_application::use_cases::HandleDnsQueryUseCase;
use wildcard_dns_domain::Config;
use wildcard_dns_infrastructure::dns::{
    DnsForwarder, DnsServerHandler, ResponseCache, ResponseCacheMaintenance,
};

/// Everything the listeners and the sweep job share, built once at startup.
pub struct DnsServices {
    pub cache: Arc<ResponseCache>,
    pub handler: DnsServerHandler,
    pub cache_maintenance: Arc<dyn CacheMaintenancePort>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let upstream = config.upstream_addr()?;
        let matcher = WildcardMatcher::new(&config.wildcard.domain)?;

        info!(
            zone = %matcher.zone(),
            upstream = %upstream,
            cache_ttl_secs = config.cache.ttl_secs,
            "Initializing DNS services"
        );

        let cache = Arc::new(ResponseCache::new(Duration::from_secs(config.cache.ttl_secs)));

        let forwarder = Arc::new(
            DnsForwarder::new(upstream, Duration::from_secs(config.upstream.timeout_secs))
                .with_tcp_fallback(config.upstream.tcp_fallback),
        );

        let use_case = Arc::new(
            HandleDnsQueryUseCase::new(cache.clone(), forwarder, matcher)
                .with_verbose(config.logging.verbose),
        );

        let cache_maintenance: Arc<dyn CacheMaintenancePort> =
            Arc::new(ResponseCacheMaintenance::new(cache.clone()));

        Ok(Self {
            cache,
            handler: DnsServerHandler::new(use_case),
            cache_maintenance,
        })
    }
}
