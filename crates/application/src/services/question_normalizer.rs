use hickory_proto::op::Query;
use wildcard_dns_domain::QuestionKey;

pub struct QuestionNormalizer;

impl QuestionNormalizer {
    /// Derive the cache key for a question.
    ///
    /// Type and class go through their mnemonic rendering, so a question
    /// carrying `TYPE1` on the wire and one carrying `A` collapse to one key.
    pub fn normalize(query: &Query) -> QuestionKey {
        QuestionKey::new(
            &query.name().to_ascii(),
            &query.query_type().to_string(),
            &query.query_class().to_string(),
        )
    }
}
