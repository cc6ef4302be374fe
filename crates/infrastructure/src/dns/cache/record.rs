use hickory_proto::op::Message;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A finished response plus the instant it stops being served.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub response: Arc<Message>,
    pub expires_at: Instant,
}

impl CachedResponse {
    pub fn new(response: Arc<Message>, ttl: Duration) -> Self {
        Self {
            response,
            expires_at: Instant::now() + ttl,
        }
    }

    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
