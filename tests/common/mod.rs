//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pix_gateway_client::config::{Credentials, RouteConfig};
use pix_gateway_client::resilience::AttemptDeadlines;
use pix_gateway_client::routing::{RouteStrategy, RouteTable};
use pix_gateway_client::RequestExecutor;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const TEST_CLIENT_ID: &str = "test-client-id";
pub const TEST_CLIENT_SECRET: &str = "test-client-secret";

pub const BLOCKED_PAGE: &str = "<!DOCTYPE html><html><body>Access denied</body></html>";

/// A running mock backend.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Raw request heads (and bodies) received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Relay endpoint template pointing at this backend.
    pub fn relay_endpoint(&self) -> String {
        format!("http://{}/relay?url={{url}}", self.addr)
    }
}

/// Start a mock backend that always returns the same response.
#[allow(dead_code)]
pub async fn start_mock_backend(status: u16, body: &'static str) -> MockBackend {
    start_programmable_backend(move |_| async move { (status, body.to_string()) }).await
}

/// Start a backend that accepts connections but answers only after `delay`.
#[allow(dead_code)]
pub async fn start_stalled_backend(delay: Duration) -> MockBackend {
    start_programmable_backend(move |_| async move {
        tokio::time::sleep(delay).await;
        (200, "{\"late\": true}".to_string())
    })
    .await
}

/// Start a programmable mock backend. The handler sees the raw request.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockBackend
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let backend = MockBackend {
        addr,
        hits: hits.clone(),
        requests: requests.clone(),
    };

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let hits = hits.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let request = read_request(&mut socket).await;
                        hits.fetch_add(1, Ordering::SeqCst);
                        requests.lock().unwrap().push(request.clone());

                        let (status, body) = f(request).await;
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_line(status),
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    backend
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        401 => "401 Unauthorized",
        403 => "403 Forbidden",
        404 => "404 Not Found",
        422 => "422 Unprocessable Entity",
        429 => "429 Too Many Requests",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Direct route pinned to a mock: the target URL travels as a query
/// parameter so tests can use real gateway URLs without leaving the host.
#[derive(Debug)]
pub struct PinnedDirect {
    pub addr: SocketAddr,
}

impl RouteStrategy for PinnedDirect {
    fn name(&self) -> &str {
        "direct"
    }

    fn is_direct(&self) -> bool {
        true
    }

    fn rewrite(&self, url: &str, timestamp_ms: u128) -> String {
        let target: String = url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
        format!("http://{}/direct?target={}&t={}", self.addr, target, timestamp_ms)
    }
}

pub fn credentials() -> Credentials {
    Credentials::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
}

pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub fn deadlines(direct_ms: u64, relay_ms: u64) -> AttemptDeadlines {
    AttemptDeadlines {
        direct: Duration::from_millis(direct_ms),
        relay: Duration::from_millis(relay_ms),
    }
}

/// Executor over a pinned direct route followed by one relay per backend.
#[allow(dead_code)]
pub fn executor_with(direct: SocketAddr, relays: &[&MockBackend], deadlines: AttemptDeadlines) -> RequestExecutor {
    let mut routes: Vec<Box<dyn RouteStrategy>> = vec![Box::new(PinnedDirect { addr: direct })];
    for (i, relay) in relays.iter().enumerate() {
        let config = RouteConfig::relay(&format!("relay{}", i + 1), &relay.relay_endpoint(), "cb");
        routes.push(pix_gateway_client::routing::strategy::from_config(&config));
    }
    RequestExecutor::new(test_client(), RouteTable::new(routes), deadlines, &credentials()).unwrap()
}
