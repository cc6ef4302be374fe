use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Resolver that receives every query outside the wildcard zone.
    #[serde(default = "default_server")]
    pub server: String,

    /// Applied separately to the send and the receive half of an exchange.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry over TCP when the UDP answer comes back truncated.
    #[serde(default = "default_tcp_fallback")]
    pub tcp_fallback: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            timeout_secs: default_timeout_secs(),
            tcp_fallback: default_tcp_fallback(),
        }
    }
}

fn default_server() -> String {
    "8.8.8.8:53".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_tcp_fallback() -> bool {
    true
}
