//! Fake Have I Been Pwned HTTP server for integration testing
//!
//! Serves the two routes the client uses over plain HTTP on an
//! OS-assigned port:
//!
//! ```text
//! GET /api/v3/breachedaccount/{account}?truncateResponse=...&includeUnverified=...
//! GET /api/v3/pasteaccount/{account}
//! ```
//!
//! Unknown accounts get `404 Not Found`, which is what the real
//! service answers for an account that is in no breach. Each
//! connection carries one request and is closed after the response.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// A canned response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub retry_after: Option<u64>,
}

/// One request as seen by the server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path including the query string.
    pub target: String,
    pub api_key: Option<String>,
    pub user_agent: Option<String>,
}

impl RecordedRequest {
    /// Path without the query string.
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }
}

/// Canned replies keyed by path (without query string).
#[derive(Debug, Clone, Default)]
pub struct HibpRoutes {
    replies: HashMap<String, Reply>,
}

impl HibpRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the breach lookup for `account` with a JSON body.
    pub fn breaches(self, account: &str, json: &str) -> Self {
        self.reply(&format!("breachedaccount/{account}"), 200, json)
    }

    /// Answer the paste lookup for `account` with a JSON body.
    pub fn pastes(self, account: &str, json: &str) -> Self {
        self.reply(&format!("pasteaccount/{account}"), 200, json)
    }

    /// Answer `route` (e.g. `breachedaccount/a@example.com`) with an
    /// arbitrary status and body.
    pub fn reply(mut self, route: &str, status: u16, body: &str) -> Self {
        self.replies.insert(
            format!("/api/v3/{route}"),
            Reply {
                status,
                body: body.to_string(),
                retry_after: None,
            },
        );
        self
    }

    /// Answer `route` with `429 Too Many Requests`.
    pub fn rate_limited(mut self, route: &str, retry_after: u64) -> Self {
        self.replies.insert(
            format!("/api/v3/{route}"),
            Reply {
                status: 429,
                body: String::new(),
                retry_after: Some(retry_after),
            },
        );
        self
    }
}

pub struct FakeHibpServer {
    port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl FakeHibpServer {
    pub async fn start(routes: HibpRoutes) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind to ephemeral port");
        let port = listener.local_addr().unwrap().port();

        let routes = Arc::new(routes);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _addr)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let mut reader = BufReader::new(stream);
                    let Some(request) = read_request(&mut reader).await else {
                        return;
                    };

                    let reply = routes.replies.get(request.path()).cloned().unwrap_or(Reply {
                        status: 404,
                        body: String::new(),
                        retry_after: None,
                    });
                    recorded.lock().unwrap().push(request);

                    let _ = reader.get_mut().write_all(&render(&reply)).await;
                    let _ = reader.get_mut().shutdown().await;
                });
            }
        });

        Self {
            port,
            requests,
            _handle: handle,
        }
    }

    /// API root to configure the client with.
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}/api/v3", self.port)
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Read the request line and headers. Requests are GETs without body.
async fn read_request(reader: &mut BufReader<tokio::net::TcpStream>) -> Option<RecordedRequest> {
    let mut line = String::new();
    reader.read_line(&mut line).await.ok()?;
    let target = line.split_whitespace().nth(1)?.to_string();

    let mut api_key = None;
    let mut user_agent = None;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).await.ok()? == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "hibp-api-key" => api_key = Some(value.trim().to_string()),
                "user-agent" => user_agent = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    Some(RecordedRequest {
        target,
        api_key,
        user_agent,
    })
}

fn render(reply: &Reply) -> Vec<u8> {
    let reason = match reply.status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        429 => "Too Many Requests",
        503 => "Service Unavailable",
        _ => "Unknown",
    };
    let retry_after = reply
        .retry_after
        .map(|s| format!("Retry-After: {s}\r\n"))
        .unwrap_or_default();
    format!(
        "HTTP/1.1 {} {reason}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         {retry_after}\
         \r\n\
         {}",
        reply.status,
        reply.body.len(),
        reply.body
    )
    .into_bytes()
}
