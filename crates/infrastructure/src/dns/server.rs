use crate::dns::codec::MessageCodec;
use crate::dns::transport::tcp::MAX_TCP_MESSAGE_SIZE;
use hickory_proto::op::{Message, MessageType};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error};
use wildcard_dns_application::use_cases::HandleDnsQueryUseCase;

/// Largest UDP reply for a client that did not advertise EDNS.
pub const MAX_UDP_RESPONSE_SIZE_NO_EDNS: usize = 512;

/// Bytes-in, bytes-out adapter between the listeners and the query use case.
///
/// `None` means nothing should be sent back.
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    pub async fn handle_udp(&self, bytes: &[u8], peer: SocketAddr) -> Option<Vec<u8>> {
        let request = match self.decode_request(bytes, peer)? {
            Ok(request) => request,
            Err(form_error) => return Some(form_error),
        };
        let reply = self.use_case.execute(&request).await;
        let encoded = Self::encode_reply(&reply)?;

        let limit = client_buffer_size(&request);
        if encoded.len() > limit {
            debug!(
                client = %peer,
                response_size = encoded.len(),
                buffer_size = limit,
                "Response exceeds client buffer, sending TC reply"
            );
            return Self::encode_reply(&truncated_reply(&reply));
        }

        Some(encoded)
    }

    pub async fn handle_tcp(&self, bytes: &[u8], peer: SocketAddr) -> Option<Vec<u8>> {
        let request = match self.decode_request(bytes, peer)? {
            Ok(request) => request,
            Err(form_error) => return Some(form_error),
        };
        let reply = self.use_case.execute(&request).await;
        let encoded = Self::encode_reply(&reply)?;

        if encoded.len() > MAX_TCP_MESSAGE_SIZE {
            error!(client = %peer, size = encoded.len(), "Reply too large for TCP framing");
            return None;
        }

        Some(encoded)
    }

    /// `Ok` carries a query to answer, `Err` a ready FORMERR reply.
    /// Responses and headerless garbage yield `None`.
    fn decode_request(&self, bytes: &[u8], peer: SocketAddr) -> Option<Result<Message, Vec<u8>>> {
        match MessageCodec::decode(bytes) {
            Ok(message) if message.message_type() == MessageType::Response => {
                debug!(client = %peer, "Ignoring DNS response sent to listener");
                None
            }
            Ok(message) => Some(Ok(message)),
            Err(e) => {
                debug!(client = %peer, error = %e, "Undecodable DNS message");
                MessageCodec::form_error_for(bytes).map(Err)
            }
        }
    }

    fn encode_reply(reply: &Message) -> Option<Vec<u8>> {
        match MessageCodec::encode(reply) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(error = %e, id = reply.id(), "Failed to encode DNS reply");
                None
            }
        }
    }
}

fn client_buffer_size(request: &Message) -> usize {
    request
        .extensions()
        .as_ref()
        .map(|edns| edns.max_payload() as usize)
        .unwrap_or(MAX_UDP_RESPONSE_SIZE_NO_EDNS)
        .max(MAX_UDP_RESPONSE_SIZE_NO_EDNS)
}

/// Header and question of `reply` with TC set and every record section empty.
fn truncated_reply(reply: &Message) -> Message {
    let mut truncated = Message::new(reply.id(), MessageType::Response, reply.op_code());
    truncated.set_truncated(true);
    truncated.set_authoritative(reply.authoritative());
    truncated.set_recursion_desired(reply.recursion_desired());
    truncated.set_recursion_available(reply.recursion_available());
    truncated.set_response_code(reply.response_code());
    truncated.add_queries(reply.queries().iter().cloned());
    truncated
}
