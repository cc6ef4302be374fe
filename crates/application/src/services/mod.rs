mod answer_synthesizer;
mod question_normalizer;
mod wildcard_matcher;

pub use answer_synthesizer::{AnswerSynthesizer, WILDCARD_RECORD_TTL};
pub use question_normalizer::QuestionNormalizer;
pub use wildcard_matcher::WildcardMatcher;
