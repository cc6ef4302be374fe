use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use wildcard_dns_domain::CliOverrides;
use wildcard_dns_jobs::CacheSweepJob;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "wildcard-dns")]
#[command(version)]
#[command(about = "Wildcard DNS responder: a-b-c-d.<zone> resolves to a.b.c.d, everything else is forwarded")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port (UDP and TCP)
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Wildcard zone answered locally
    #[arg(long)]
    domain: Option<String>,

    /// Upstream resolver address (ip:port)
    #[arg(long)]
    upstream: Option<String>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log cache hits and misses at info level
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        port: cli.port,
        bind_address: cli.bind,
        domain: cli.domain,
        upstream: cli.upstream,
        log_level: cli.log_level,
        verbose: cli.verbose,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        zone = %config.wildcard.domain,
        upstream = %config.upstream.server,
        verbose = config.logging.verbose,
        "Starting wildcard DNS responder"
    );

    let dns_services = di::DnsServices::new(&config)?;
    let shutdown = CancellationToken::new();

    let sweep_job = Arc::new(
        CacheSweepJob::new(dns_services.cache_maintenance.clone())
            .with_interval(Duration::from_secs(config.cache.sweep_interval_secs))
            .with_cancellation(shutdown.clone()),
    );
    sweep_job.start();

    let dns_server = server::start_dns_server(
        config.server.listen_addr(),
        Duration::from_secs(config.server.tcp_idle_timeout_secs),
        dns_services.handler.clone(),
        shutdown.clone(),
    );
    tokio::pin!(dns_server);

    tokio::select! {
        result = &mut dns_server => {
            if let Err(e) = &result {
                error!(error = %e, "Failed to start DNS server");
            }
            shutdown.cancel();
            result?;
        }
        signal = server::shutdown_signal() => {
            error!(signal = signal.name(), "Received termination signal, shutting down");
            shutdown.cancel();
            dns_server.await?;
        }
    }

    let snapshot = dns_services.cache.metrics_snapshot();
    info!(
        cache_entries = snapshot.total_entries,
        hits = snapshot.hits,
        misses = snapshot.misses,
        "Server shutdown complete"
    );
    Ok(())
}
