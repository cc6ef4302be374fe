use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::net::Ipv4Addr;

/// TTL handed out on every synthesized A record.
pub const WILDCARD_RECORD_TTL: u32 = 3600;

pub struct AnswerSynthesizer;

impl AnswerSynthesizer {
    /// Build a response holding exactly one IN A record for the question name.
    ///
    /// The id is left at zero; the request handler stamps the real one when
    /// it answers a specific client.
    pub fn synthesize(query: &Query, address: Ipv4Addr) -> Message {
        let mut message = Message::new(0, MessageType::Response, OpCode::Query);
        message.add_query(query.clone());
        message.add_answer(Record::from_rdata(
            query.name().clone(),
            WILDCARD_RECORD_TTL,
            RData::A(A(address)),
        ));
        message
    }
}
