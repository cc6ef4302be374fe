//! DNS wire codec
//!
//! Thin layer over `hickory-proto` for turning raw datagrams and TCP frames
//! into [`Message`] values and back. Name compression is applied by the
//! encoder on every message it emits.

use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use wildcard_dns_domain::DomainError;

/// Size of the fixed DNS header.
pub const DNS_HEADER_LEN: usize = 12;

const QR_BIT: u8 = 0x80;

pub struct MessageCodec;

impl MessageCodec {
    pub fn decode(bytes: &[u8]) -> Result<Message, DomainError> {
        Message::from_vec(bytes).map_err(|e| {
            DomainError::InvalidDnsMessage(format!("Failed to parse DNS message: {}", e))
        })
    }

    pub fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsMessage(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }

    /// Encode `message` under a fresh random id, for sending upstream.
    ///
    /// Returns the id so the caller can match the reply against it.
    pub fn encode_with_fresh_id(message: &Message) -> Result<(u16, Vec<u8>), DomainError> {
        let id = fastrand::u16(..);
        let mut outbound = message.clone();
        let mut header = *outbound.header();
        header.set_id(id);
        outbound.set_header(header);
        let bytes = Self::encode(&outbound)?;
        Ok((id, bytes))
    }

    /// FORMERR reply for bytes that did not decode.
    ///
    /// `None` when there is not even a full header to answer, or when the
    /// bytes claim to be a response already.
    pub fn form_error_for(bytes: &[u8]) -> Option<Vec<u8>> {
        if bytes.len() < DNS_HEADER_LEN || bytes[2] & QR_BIT != 0 {
            return None;
        }

        let id = u16::from_be_bytes([bytes[0], bytes[1]]);
        let mut reply = Message::new(id, MessageType::Response, OpCode::Query);
        reply.set_response_code(ResponseCode::FormErr);
        reply.set_recursion_available(true);
        Self::encode(&reply).ok()
    }
}
