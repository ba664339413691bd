// Shared test plumbing: a single-connection-at-a-time HTTP stub so the
// transport contract can be exercised without a real backend.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use loopvoice::config::BackendConfig;
use loopvoice::transport::VoiceClient;

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl StubResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, bytes: Vec<u8>) -> Self {
        self.body = bytes;
        self
    }
}

pub struct StubServer {
    pub base_url: String,
    /// Connections accepted so far.
    pub hits: Arc<AtomicUsize>,
    /// Raw bytes of the most recent request.
    pub last_request: Arc<Mutex<Vec<u8>>>,
}

/// Serve `response` to every connection until the test process exits.
pub async fn spawn_stub(response: StubResponse) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener addr");

    let hits = Arc::new(AtomicUsize::new(0));
    let last_request = Arc::new(Mutex::new(Vec::new()));

    let counter = hits.clone();
    let captured = last_request.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);

            // Read headers, then exactly the declared body length.
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            let mut header_end = None;
            while header_end.is_none() {
                let Ok(n) = socket.read(&mut buf).await else {
                    break;
                };
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                header_end = find_header_end(&raw);
            }
            if let Some(end) = header_end {
                let content_length = parse_content_length(&raw[..end]);
                while raw.len() < end + content_length {
                    let Ok(n) = socket.read(&mut buf).await else {
                        break;
                    };
                    if n == 0 {
                        break;
                    }
                    raw.extend_from_slice(&buf[..n]);
                }
            }
            *captured.lock().expect("request capture lock") = raw;

            let reason = match response.status {
                200 => "OK",
                500 => "Internal Server Error",
                _ => "Status",
            };
            let mut out = format!("HTTP/1.1 {} {}\r\n", response.status, reason).into_bytes();
            for (name, value) in &response.headers {
                out.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
            }
            out.extend_from_slice(
                format!("content-length: {}\r\n", response.body.len()).as_bytes(),
            );
            out.extend_from_slice(b"connection: close\r\n\r\n");
            out.extend_from_slice(&response.body);

            let _ = socket.write_all(&out).await;
            let _ = socket.shutdown().await;
        }
    });

    StubServer {
        base_url: format!("http://{addr}"),
        hits,
        last_request,
    }
}

pub fn client_for(base_url: &str) -> VoiceClient {
    VoiceClient::new(&BackendConfig::with_base_url(base_url))
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos + 4)
}

fn parse_content_length(header_block: &[u8]) -> usize {
    let text = String::from_utf8_lossy(header_block).to_lowercase();
    for line in text.lines() {
        if let Some(value) = line.strip_prefix("content-length:") {
            return value.trim().parse().unwrap_or(0);
        }
    }
    0
}
