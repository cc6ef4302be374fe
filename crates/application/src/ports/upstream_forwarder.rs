use async_trait::async_trait;
use hickory_proto::op::Message;
use wildcard_dns_domain::DomainError;

/// Exchanges a query with the upstream resolver.
#[async_trait]
pub trait UpstreamForwarder: Send + Sync {
    /// Send `request` upstream and return the decoded answer.
    ///
    /// Implementations bound both the send and the receive with a timeout and
    /// never retry on their own.
    async fn forward(&self, request: &Message) -> Result<Message, DomainError>;
}
