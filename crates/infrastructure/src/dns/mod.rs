pub mod cache;
pub mod cache_maintenance;
pub mod codec;
pub mod forwarding;
pub mod listener;
pub mod server;
pub mod transport;

pub use cache::{CacheMetrics, CacheMetricsSnapshot, CachedResponse, ResponseCache};
pub use cache_maintenance::ResponseCacheMaintenance;
pub use codec::MessageCodec;
pub use forwarding::DnsForwarder;
pub use server::DnsServerHandler;
pub use listener::{bind_tcp, bind_udp, run_tcp_listener, run_udp_listener};
