//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a single static body on GET, optionally demanding one exact
//! `Authorization` header (401 otherwise) or `Proxy-Authorization` header
//! (407 otherwise), and records the headers of every request it receives.
//! Pointing a client's proxy setting at it works too: the absolute-form
//! request line is recorded as sent.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// If set, requests without exactly this `Authorization` value get 401.
    pub required_authorization: Option<String>,
    /// If set, requests without exactly this `Proxy-Authorization` value get 407.
    pub required_proxy_authorization: Option<String>,
    /// If set, every GET is answered with this status and an empty body.
    pub status_override: Option<u16>,
}

/// Request line plus lower-cased header names.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub request_line: String,
    pub headers: HashMap<String, String>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

pub struct TestServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `base_url` with `user_info@` inserted after the scheme.
    pub fn url_with_user_info(&self, user_info: &str, path: &str) -> String {
        let rest = self.base_url.trim_start_matches("http://");
        format!("http://{}@{}{}", user_info, rest, path)
    }
}

/// Starts a server in a background thread serving `body`. Runs until the process exits.
pub fn start(body: Vec<u8>, opts: ServerOptions) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let recorded = Arc::clone(&recorded);
            let opts = opts.clone();
            thread::spawn(move || handle(stream, &body, &opts, &recorded));
        }
    });
    TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    body: &[u8],
    opts: &ServerOptions,
    recorded: &Mutex<Vec<RecordedRequest>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => parse_request(s),
        Err(_) => return,
    };
    let proxy_authorized = match &opts.required_proxy_authorization {
        Some(expected) => request.header("proxy-authorization") == Some(expected.as_str()),
        None => true,
    };
    let authorized = match &opts.required_authorization {
        Some(expected) => request.header("authorization") == Some(expected.as_str()),
        None => true,
    };
    recorded.lock().unwrap().push(request);

    if !proxy_authorized {
        let _ = stream.write_all(
            b"HTTP/1.1 407 Proxy Authentication Required\r\nProxy-Authenticate: Basic realm=\"proxy\"\r\nContent-Length: 0\r\n\r\n",
        );
        return;
    }
    if !authorized {
        let _ = stream.write_all(
            b"HTTP/1.1 401 Unauthorized\r\nWWW-Authenticate: Basic realm=\"test\"\r\nContent-Length: 0\r\n\r\n",
        );
        return;
    }
    if let Some(status) = opts.status_override {
        let response = format!("HTTP/1.1 {} Test\r\nContent-Length: 0\r\n\r\n", status);
        let _ = stream.write_all(response.as_bytes());
        return;
    }
    let head = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", body.len());
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

fn parse_request(request: &str) -> RecordedRequest {
    let mut lines = request.lines();
    let request_line = lines.next().unwrap_or("").trim().to_string();
    let mut headers = HashMap::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }
    RecordedRequest {
        request_line,
        headers,
    }
}
