use compact_str::CompactString;
use std::fmt;

/// Cache identity of a DNS question.
///
/// The name is compared case-insensitively; type and class are kept in their
/// mnemonic form (`A`, `IN`), so two questions that differ only in letter case
/// or in header fields share one key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QuestionKey {
    name: CompactString,
    record_type: CompactString,
    record_class: CompactString,
}

impl QuestionKey {
    pub fn new(name: &str, record_type: &str, record_class: &str) -> Self {
        Self {
            name: CompactString::from(name.to_ascii_lowercase()),
            record_type: CompactString::from(record_type.to_ascii_uppercase()),
            record_class: CompactString::from(record_class.to_ascii_uppercase()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    pub fn record_class(&self) -> &str {
        &self.record_class
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.record_class, self.record_type)
    }
}
