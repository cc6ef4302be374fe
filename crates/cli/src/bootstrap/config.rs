use anyhow::Context;
use std::net::SocketAddr;
use wildcard_dns_domain::{CliOverrides, Config};

/// Resolve the effective configuration and reject anything unusable before a
/// socket is opened.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    config
        .server
        .listen_addr()
        .parse::<SocketAddr>()
        .with_context(|| {
            format!(
                "Invalid listen address '{}'",
                config.server.listen_addr()
            )
        })?;

    Ok(config)
}
