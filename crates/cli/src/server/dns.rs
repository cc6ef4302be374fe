use anyhow::Context;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::info;
use wildcard_dns_infrastructure::dns::{
    bind_tcp, bind_udp, run_tcp_listener, run_udp_listener, DnsServerHandler,
};

/// Bind UDP and TCP on the same address and serve until `shutdown` fires.
///
/// A bind failure on either transport is returned before anything is served.
pub async fn start_dns_server(
    bind_addr: String,
    tcp_idle_timeout: Duration,
    handler: DnsServerHandler,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", bind_addr))?;

    let udp_socket = bind_udp(socket_addr).context("UDP listener")?;
    let tcp_listener = bind_tcp(socket_addr).context("TCP listener")?;

    let mut join_set: JoinSet<()> = JoinSet::new();

    join_set.spawn(run_udp_listener(
        udp_socket,
        handler.clone(),
        shutdown.clone(),
    ));
    join_set.spawn(run_tcp_listener(
        tcp_listener,
        handler,
        tcp_idle_timeout,
        shutdown,
    ));

    info!(bind_address = %socket_addr, "DNS server ready on UDP and TCP");

    while join_set.join_next().await.is_some() {}
    Ok(())
}
