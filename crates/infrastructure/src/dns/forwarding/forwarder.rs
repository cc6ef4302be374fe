use crate::dns::codec::MessageCodec;
use crate::dns::transport::tcp::TcpTransport;
use crate::dns::transport::udp::UdpTransport;
use crate::dns::transport::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, warn};
use wildcard_dns_application::ports::UpstreamForwarder;
use wildcard_dns_domain::DomainError;

/// Forwards queries to a single upstream resolver over UDP.
///
/// Every exchange goes out under a fresh random id and the reply must carry
/// the same id back. Truncated UDP replies are retried once over TCP unless
/// the fallback is disabled.
pub struct DnsForwarder {
    server: SocketAddr,
    udp: UdpTransport,
    tcp: TcpTransport,
    timeout: Duration,
    tcp_fallback: bool,
}

impl DnsForwarder {
    pub fn new(server: SocketAddr, timeout: Duration) -> Self {
        Self {
            server,
            udp: UdpTransport::new(server),
            tcp: TcpTransport::new(server),
            timeout,
            tcp_fallback: true,
        }
    }

    pub fn with_tcp_fallback(mut self, enabled: bool) -> Self {
        self.tcp_fallback = enabled;
        self
    }

    fn decode_reply(
        &self,
        expected_id: u16,
        response: TransportResponse,
    ) -> Result<Message, DomainError> {
        let message = MessageCodec::decode(&response.bytes)?;

        if message.id() != expected_id {
            warn!(
                server = %self.server,
                expected_id,
                received_id = message.id(),
                protocol = response.protocol_used,
                "Upstream reply id mismatch"
            );
            return Err(DomainError::InvalidDnsMessage(format!(
                "Reply id {} does not match query id {}",
                message.id(),
                expected_id
            )));
        }

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsMessage(
                "Upstream sent a query instead of a response".to_string(),
            ));
        }

        Ok(message)
    }
}

#[async_trait]
impl UpstreamForwarder for DnsForwarder {
    async fn forward(&self, request: &Message) -> Result<Message, DomainError> {
        let (query_id, bytes) = MessageCodec::encode_with_fresh_id(request)?;

        let response = self.udp.send(&bytes, self.timeout).await?;
        let mut message = self.decode_reply(query_id, response)?;

        if message.truncated() && self.tcp_fallback {
            debug!(
                server = %self.server,
                protocol = self.tcp.protocol_name(),
                "Truncated UDP reply, retrying over TCP"
            );
            let response = self.tcp.send(&bytes, self.timeout).await?;
            message = self.decode_reply(query_id, response)?;
        }

        let mut header = *message.header();
        header.set_id(request.id());
        message.set_header(header);

        debug!(
            server = %self.server,
            answers = message.answers().len(),
            rcode = ?message.response_code(),
            "Upstream reply received"
        );

        Ok(message)
    }
}
