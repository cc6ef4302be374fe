use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio_util::sync::CancellationToken;
use wildcard_dns_infrastructure::dns::MessageCodec;

pub const MOCK_UPSTREAM_TTL: u32 = 60;

#[derive(Clone, Copy, Debug)]
pub enum UpstreamBehavior {
    /// Answer every query with one A record.
    Answer(Ipv4Addr),
    /// Reply NXDOMAIN with no answers.
    NxDomain,
    /// Never reply.
    Silent,
    /// Reply over UDP with TC set and no answers; answer fully over TCP.
    TruncateUdp(Ipv4Addr),
    /// Reply with an id that does not match the query.
    WrongId,
}

/// Upstream resolver stand-in listening on UDP and TCP on one loopback port.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown: CancellationToken,
}

impl MockDnsServer {
    pub async fn start(behavior: UpstreamBehavior) -> std::io::Result<Self> {
        let udp = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = udp.local_addr()?;
        let tcp = TcpListener::bind(addr).await?;

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let shutdown = CancellationToken::new();

        tokio::spawn(serve_udp(
            udp,
            behavior,
            udp_queries.clone(),
            shutdown.clone(),
        ));
        tokio::spawn(serve_tcp(
            tcp,
            behavior,
            tcp_queries.clone(),
            shutdown.clone(),
        ));

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn serve_udp(
    socket: UdpSocket,
    behavior: UpstreamBehavior,
    counter: Arc<AtomicUsize>,
    shutdown: CancellationToken,
) {
    let mut buf = vec![0u8; 4096];

    loop {
        let (len, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = socket.recv_from(&mut buf) => match result {
                Ok(received) => received,
                Err(_) => continue,
            },
        };

        counter.fetch_add(1, Ordering::SeqCst);

        let Ok(query) = MessageCodec::decode(&buf[..len]) else {
            continue;
        };

        let reply = match behavior {
            UpstreamBehavior::Silent => continue,
            UpstreamBehavior::TruncateUdp(_) => {
                let mut reply = reply_skeleton(&query);
                reply.set_truncated(true);
                reply
            }
            UpstreamBehavior::WrongId => {
                let mut reply = answer(&query, Ipv4Addr::new(192, 0, 2, 66));
                let mut header = *reply.header();
                header.set_id(query.id().wrapping_add(1));
                reply.set_header(header);
                reply
            }
            other => build_reply(&query, other),
        };

        if let Ok(bytes) = MessageCodec::encode(&reply) {
            let _ = socket.send_to(&bytes, peer).await;
        }
    }
}

async fn serve_tcp(
    listener: TcpListener,
    behavior: UpstreamBehavior,
    counter: Arc<AtomicUsize>,
    shutdown: CancellationToken,
) {
    loop {
        let stream = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = listener.accept() => match result {
                Ok((stream, _)) => stream,
                Err(_) => continue,
            },
        };

        let counter = counter.clone();
        tokio::spawn(async move {
            let _ = answer_tcp_once(stream, behavior, counter).await;
        });
    }
}

async fn answer_tcp_once(
    mut stream: TcpStream,
    behavior: UpstreamBehavior,
    counter: Arc<AtomicUsize>,
) -> std::io::Result<()> {
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;
    let mut query_buf = vec![0u8; u16::from_be_bytes(len_buf) as usize];
    stream.read_exact(&mut query_buf).await?;

    counter.fetch_add(1, Ordering::SeqCst);

    let Ok(query) = MessageCodec::decode(&query_buf) else {
        return Ok(());
    };
    if matches!(behavior, UpstreamBehavior::Silent) {
        tokio::time::sleep(Duration::from_secs(30)).await;
        return Ok(());
    }

    let reply = build_reply(&query, behavior);
    if let Ok(bytes) = MessageCodec::encode(&reply) {
        stream.write_all(&(bytes.len() as u16).to_be_bytes()).await?;
        stream.write_all(&bytes).await?;
    }
    Ok(())
}

fn build_reply(query: &Message, behavior: UpstreamBehavior) -> Message {
    match behavior {
        UpstreamBehavior::Answer(ip) | UpstreamBehavior::TruncateUdp(ip) => answer(query, ip),
        UpstreamBehavior::NxDomain => {
            let mut reply = reply_skeleton(query);
            reply.set_response_code(ResponseCode::NXDomain);
            reply
        }
        UpstreamBehavior::WrongId => answer(query, Ipv4Addr::new(192, 0, 2, 66)),
        UpstreamBehavior::Silent => reply_skeleton(query),
    }
}

fn reply_skeleton(query: &Message) -> Message {
    let mut reply = Message::new(query.id(), MessageType::Response, OpCode::Query);
    reply.set_recursion_desired(query.recursion_desired());
    reply.set_recursion_available(true);
    reply.add_queries(query.queries().iter().cloned());
    reply
}

fn answer(query: &Message, ip: Ipv4Addr) -> Message {
    let mut reply = reply_skeleton(query);
    if let Some(question) = query.queries().first() {
        if question.query_type() == RecordType::A {
            reply.add_answer(Record::from_rdata(
                question.name().clone(),
                MOCK_UPSTREAM_TTL,
                RData::A(A(ip)),
            ));
        }
    }
    reply
}

/// Client-side query message.
pub fn query(id: u16, name: &str, record_type: RecordType) -> Message {
    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(Query::query(Name::from_str(name).unwrap(), record_type));
    message
}

pub async fn udp_exchange(server: SocketAddr, request: &Message) -> Message {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let bytes = MessageCodec::encode(request).unwrap();
    socket.send_to(&bytes, server).await.unwrap();

    let reply = udp_recv(&socket, Duration::from_secs(5)).await.unwrap();
    MessageCodec::decode(&reply).unwrap()
}

pub async fn udp_recv(socket: &UdpSocket, wait: Duration) -> Option<Vec<u8>> {
    let mut buf = vec![0u8; 4096];
    match tokio::time::timeout(wait, socket.recv_from(&mut buf)).await {
        Ok(Ok((len, _))) => {
            buf.truncate(len);
            Some(buf)
        }
        _ => None,
    }
}

pub async fn tcp_exchange(stream: &mut TcpStream, request: &Message) -> Message {
    let bytes = MessageCodec::encode(request).unwrap();
    stream.write_all(&(bytes.len() as u16).to_be_bytes()).await.unwrap();
    stream.write_all(&bytes).await.unwrap();

    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await.unwrap();
    let mut reply = vec![0u8; u16::from_be_bytes(len_buf) as usize];
    stream.read_exact(&mut reply).await.unwrap();
    MessageCodec::decode(&reply).unwrap()
}

pub fn a_addresses(message: &Message) -> Vec<Ipv4Addr> {
    message
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            RData::A(a) => Some(a.0),
            _ => None,
        })
        .collect()
}
