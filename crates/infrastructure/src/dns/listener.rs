//! UDP and TCP listeners sharing one port.
//!
//! Sockets are built with `socket2` and handed to tokio. Every datagram and
//! every TCP connection is served on its own task; both accept loops return
//! once the shutdown token is cancelled.

use super::server::DnsServerHandler;
use super::transport::tcp::{read_frame, send_with_length_prefix};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wildcard_dns_domain::DomainError;

const UDP_RECV_BUFFER: usize = 4096;
const TCP_BACKLOG: i32 = 1024;

fn socket_domain(addr: SocketAddr) -> Domain {
    if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    }
}

fn bind_error(addr: SocketAddr, protocol: &str, e: io::Error) -> DomainError {
    DomainError::IoError(format!("Failed to bind {} {}: {}", protocol, addr, e))
}

/// Bind the UDP listener socket.
///
/// No address reuse is requested, so a port already held by another process
/// fails here.
pub fn bind_udp(addr: SocketAddr) -> Result<UdpSocket, DomainError> {
    let build = || -> io::Result<UdpSocket> {
        let socket = Socket::new(socket_domain(addr), Type::DGRAM, Some(Protocol::UDP))?;
        if addr.is_ipv6() {
            socket.set_only_v6(false)?;
        }
        socket.bind(&addr.into())?;
        socket.set_nonblocking(true)?;
        let std_socket: std::net::UdpSocket = socket.into();
        UdpSocket::from_std(std_socket)
    };

    build().map_err(|e| bind_error(addr, "UDP", e))
}

pub fn bind_tcp(addr: SocketAddr) -> Result<TcpListener, DomainError> {
    let build = || -> io::Result<TcpListener> {
        let socket = Socket::new(socket_domain(addr), Type::STREAM, Some(Protocol::TCP))?;
        if addr.is_ipv6() {
            socket.set_only_v6(false)?;
        }
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.listen(TCP_BACKLOG)?;
        socket.set_nonblocking(true)?;
        let std_listener: std::net::TcpListener = socket.into();
        TcpListener::from_std(std_listener)
    };

    build().map_err(|e| bind_error(addr, "TCP", e))
}

pub async fn run_udp_listener(
    socket: UdpSocket,
    handler: DnsServerHandler,
    shutdown: CancellationToken,
) {
    let socket = Arc::new(socket);
    let mut recv_buf = [0u8; UDP_RECV_BUFFER];

    if let Ok(addr) = socket.local_addr() {
        info!(bind_address = %addr, "UDP listener started");
    }

    loop {
        let received = tokio::select! {
            _ = shutdown.cancelled() => break,
            received = socket.recv_from(&mut recv_buf) => received,
        };

        let (len, peer) = match received {
            Ok(received) => received,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                // ICMP errors from earlier replies surface here on some platforms.
                warn!(error = %e, "UDP receive error");
                continue;
            }
        };

        let datagram: Arc<[u8]> = Arc::from(&recv_buf[..len]);
        let socket = Arc::clone(&socket);
        let handler = handler.clone();

        tokio::spawn(async move {
            if let Some(reply) = handler.handle_udp(&datagram, peer).await {
                if let Err(e) = socket.send_to(&reply, peer).await {
                    debug!(client = %peer, error = %e, "Failed to send UDP reply");
                }
            }
        });
    }

    info!("UDP listener stopped");
}

pub async fn run_tcp_listener(
    listener: TcpListener,
    handler: DnsServerHandler,
    idle_timeout: Duration,
    shutdown: CancellationToken,
) {
    if let Ok(addr) = listener.local_addr() {
        info!(bind_address = %addr, "TCP listener started");
    }

    loop {
        let accepted = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => accepted,
        };

        match accepted {
            Ok((stream, peer)) => {
                let handler = handler.clone();
                let shutdown = shutdown.clone();
                tokio::spawn(async move {
                    serve_tcp_connection(stream, peer, handler, idle_timeout, shutdown).await;
                });
            }
            Err(e) => {
                warn!(error = %e, "TCP accept error");
            }
        }
    }

    info!("TCP listener stopped");
}

async fn serve_tcp_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    handler: DnsServerHandler,
    idle_timeout: Duration,
    shutdown: CancellationToken,
) {
    let _ = stream.set_nodelay(true);
    debug!(client = %peer, "TCP connection accepted");

    loop {
        let frame = tokio::select! {
            _ = shutdown.cancelled() => break,
            frame = tokio::time::timeout(idle_timeout, read_frame(&mut stream)) => frame,
        };

        let request = match frame {
            Ok(Ok(Some(request))) => request,
            Ok(Ok(None)) => break,
            Ok(Err(e)) => {
                debug!(client = %peer, error = %e, "TCP read failed");
                break;
            }
            Err(_) => {
                debug!(client = %peer, "Closing idle TCP connection");
                break;
            }
        };

        let Some(reply) = handler.handle_tcp(&request, peer).await else {
            continue;
        };

        if let Err(e) = send_with_length_prefix(&mut stream, &reply).await {
            debug!(client = %peer, error = %e, "Failed to send TCP reply");
            break;
        }
    }

    debug!(client = %peer, "TCP connection closed");
}
