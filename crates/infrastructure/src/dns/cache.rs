mod metrics;
mod record;
mod storage;

pub use metrics::{CacheMetrics, CacheMetricsSnapshot};
pub use record::CachedResponse;
pub use storage::ResponseCache;
