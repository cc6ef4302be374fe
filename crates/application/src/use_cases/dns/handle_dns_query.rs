use crate::ports::{ResponseCachePort, UpstreamForwarder};
use crate::services::{AnswerSynthesizer, QuestionNormalizer, WildcardMatcher};
use hickory_proto::op::{Message, MessageType, Query, ResponseCode};
use std::sync::Arc;
use tracing::{debug, info, warn};
use wildcard_dns_domain::QuestionKey;

/// Answers one inbound DNS message.
///
/// Cache first; on a miss the question is either synthesized from the
/// wildcard zone or forwarded upstream, and whatever comes back (an empty
/// answer if the upstream failed) is cached and relayed. A reply is always
/// produced.
pub struct HandleDnsQueryUseCase {
    cache: Arc<dyn ResponseCachePort>,
    forwarder: Arc<dyn UpstreamForwarder>,
    matcher: WildcardMatcher,
    verbose: bool,
}

impl HandleDnsQueryUseCase {
    pub fn new(
        cache: Arc<dyn ResponseCachePort>,
        forwarder: Arc<dyn UpstreamForwarder>,
        matcher: WildcardMatcher,
    ) -> Self {
        Self {
            cache,
            forwarder,
            matcher,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub async fn execute(&self, request: &Message) -> Message {
        let Some(query) = request.queries().first() else {
            debug!(id = request.id(), "Request without a question");
            return Self::error_reply(request, ResponseCode::FormErr);
        };

        let key = QuestionNormalizer::normalize(query);

        let response = match self.cache.get(&key) {
            Some(cached) => {
                self.log_cache_event(&key, true);
                cached
            }
            None => {
                self.log_cache_event(&key, false);
                let mut resolved = self.resolve(request, query).await;
                Self::mark_answer_flags(&mut resolved);
                let resolved = Arc::new(resolved);
                self.cache.set(key.clone(), Arc::clone(&resolved));
                self.log_cached(&key);
                resolved
            }
        };

        Self::reply_to(&response, request)
    }

    async fn resolve(&self, request: &Message, query: &Query) -> Message {
        if let Some(address) = self.matcher.match_query(query) {
            debug!(domain = %query.name(), address = %address, "Synthesizing wildcard answer");
            return AnswerSynthesizer::synthesize(query, address);
        }

        match self.forwarder.forward(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(domain = %query.name(), error = %e, "Error resolving upstream, replying with empty answer");
                Message::new(0, MessageType::Response, request.op_code())
            }
        }
    }

    fn log_cache_event(&self, key: &QuestionKey, hit: bool) {
        match (self.verbose, hit) {
            (true, true) => info!(question = %key, "Cache hit"),
            (true, false) => info!(question = %key, "Cache miss"),
            (false, true) => debug!(question = %key, "Cache hit"),
            (false, false) => debug!(question = %key, "Cache miss"),
        }
    }

    fn log_cached(&self, key: &QuestionKey) {
        let cache_size = self.cache.cache_size();
        if self.verbose {
            info!(question = %key, cache_size, "Response cached");
        } else {
            debug!(question = %key, cache_size, "Response cached");
        }
    }

    fn mark_answer_flags(response: &mut Message) {
        let mut header = *response.header();
        header.set_message_type(MessageType::Response);
        response.set_header(header);
        response.set_authoritative(true);
        response.set_recursion_available(true);
    }

    /// Copy of `response` addressed to `request`: its id, opcode, RD bit and
    /// question section. The cached value itself is left untouched.
    fn reply_to(response: &Message, request: &Message) -> Message {
        let mut reply = response.clone();
        let mut header = *reply.header();
        header.set_id(request.id());
        reply.set_header(header);
        reply.set_op_code(request.op_code());
        reply.set_recursion_desired(request.recursion_desired());
        reply.take_queries();
        reply.add_queries(request.queries().iter().cloned());
        reply
    }

    fn error_reply(request: &Message, code: ResponseCode) -> Message {
        let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
        reply.set_recursion_desired(request.recursion_desired());
        reply.set_recursion_available(true);
        reply.set_response_code(code);
        reply
    }
}
