use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use wildcard_dns_application::ports::{ResponseCachePort, UpstreamForwarder};
use wildcard_dns_domain::{DomainError, QuestionKey};

pub const UPSTREAM_TTL: u32 = 300;

/// Upstream stand-in answering from a fixed table of A records.
#[derive(Clone)]
pub struct MockUpstreamForwarder {
    answers: Arc<RwLock<HashMap<String, Ipv4Addr>>>,
    should_fail: Arc<RwLock<bool>>,
    reply_as_query: Arc<RwLock<bool>>,
    call_count: Arc<AtomicUsize>,
}

impl MockUpstreamForwarder {
    pub fn new() -> Self {
        Self {
            answers: Arc::new(RwLock::new(HashMap::new())),
            should_fail: Arc::new(RwLock::new(false)),
            reply_as_query: Arc::new(RwLock::new(false)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_answer(self, name: &str, address: &str) -> Self {
        self.answers
            .write()
            .unwrap()
            .insert(name.to_ascii_lowercase(), address.parse().unwrap());
        self
    }

    pub fn failing() -> Self {
        let forwarder = Self::new();
        *forwarder.should_fail.write().unwrap() = true;
        forwarder
    }

    /// Upstream that leaves the QR bit clear on its replies.
    pub fn replying_as_query(self) -> Self {
        *self.reply_as_query.write().unwrap() = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockUpstreamForwarder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamForwarder for MockUpstreamForwarder {
    async fn forward(&self, request: &Message) -> Result<Message, DomainError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if *self.should_fail.read().unwrap() {
            return Err(DomainError::TransportTimeout {
                server: "mock".to_string(),
            });
        }

        let message_type = if *self.reply_as_query.read().unwrap() {
            MessageType::Query
        } else {
            MessageType::Response
        };
        let mut response = Message::new(request.id(), message_type, OpCode::Query);
        response.set_recursion_desired(true);
        response.set_recursion_available(true);

        if let Some(query) = request.queries().first() {
            response.add_query(query.clone());
            let name = query.name().to_ascii().to_ascii_lowercase();
            if let Some(address) = self.answers.read().unwrap().get(&name) {
                response.add_answer(Record::from_rdata(
                    query.name().clone(),
                    UPSTREAM_TTL,
                    RData::A(A(*address)),
                ));
            }
        }

        Ok(response)
    }
}

/// Plain map cache without expiration.
#[derive(Default)]
pub struct MockResponseCache {
    entries: RwLock<HashMap<QuestionKey, Arc<Message>>>,
    set_count: AtomicUsize,
    size_reads: AtomicUsize,
}

impl MockResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_count(&self) -> usize {
        self.set_count.load(Ordering::SeqCst)
    }

    /// How many times `cache_size` was read through the port.
    pub fn size_reads(&self) -> usize {
        self.size_reads.load(Ordering::SeqCst)
    }

    pub fn stored(&self, key: &QuestionKey) -> Option<Arc<Message>> {
        self.entries.read().unwrap().get(key).cloned()
    }

    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}

impl ResponseCachePort for MockResponseCache {
    fn get(&self, key: &QuestionKey) -> Option<Arc<Message>> {
        self.entries.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: QuestionKey, response: Arc<Message>) {
        self.set_count.fetch_add(1, Ordering::SeqCst);
        self.entries.write().unwrap().insert(key, response);
    }

    fn cache_size(&self) -> usize {
        self.size_reads.fetch_add(1, Ordering::SeqCst);
        self.entries.read().unwrap().len()
    }
}

pub fn request(id: u16, name: &str, record_type: RecordType) -> Message {
    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(Query::query(Name::from_str(name).unwrap(), record_type));
    message
}

pub fn a_addresses(message: &Message) -> Vec<Ipv4Addr> {
    message
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            RData::A(a) => Some(a.0),
            _ => None,
        })
        .collect()
}
