use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;
use wildcard_dns_domain::Config;

/// Install the global subscriber. The configured level is the default
/// directive; `RUST_LOG` may refine it per target.
pub fn init_logging(config: &Config) {
    let default_directive: Directive = config
        .logging
        .level
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());

    let filter = EnvFilter::builder()
        .with_default_directive(default_directive)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}
