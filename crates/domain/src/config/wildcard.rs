use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WildcardConfig {
    /// Zone whose subdomains carry an embedded IPv4 address,
    /// e.g. `10-0-0-1.int.example.com`.
    #[serde(default = "default_domain")]
    pub domain: String,
}

impl WildcardConfig {
    /// The configured domain in canonical form: lower case, no leading dot,
    /// exactly one trailing dot.
    pub fn zone(&self) -> String {
        normalize_zone(&self.domain)
    }
}

impl Default for WildcardConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
        }
    }
}

pub fn normalize_zone(domain: &str) -> String {
    let trimmed = domain.trim().trim_start_matches('.').trim_end_matches('.');
    if trimmed.is_empty() {
        return String::new();
    }
    let mut zone = trimmed.to_ascii_lowercase();
    zone.push('.');
    zone
}

fn default_domain() -> String {
    "int.example.com".to_string()
}
