use hickory_proto::op::Message;
use std::sync::Arc;
use wildcard_dns_domain::QuestionKey;

/// Question-keyed store of finished responses.
///
/// Callers share one instance across every in-flight request of both
/// listeners, so implementations synchronize internally. Cached messages are
/// handed out behind an `Arc` and must never be mutated in place.
pub trait ResponseCachePort: Send + Sync {
    /// Returns the stored response unless its expiration has passed.
    fn get(&self, key: &QuestionKey) -> Option<Arc<Message>>;

    /// Inserts or replaces the response and restarts its expiration.
    fn set(&self, key: QuestionKey, response: Arc<Message>);

    fn cache_size(&self) -> usize;
}
