//! Helpers shared by the integration tests: tracing setup and a minimal
//! HTTP/1.1 responder for listeners mockito cannot provide (Unix sockets,
//! truncated bodies).

#![allow(dead_code)]

use std::sync::Once;

use tokio::io::{AsyncRead, AsyncReadExt};

static TRACING_INIT: Once = Once::new();

pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bcb_rpc_core=debug")),
            )
            .with_target(true)
            .with_test_writer()
            .try_init();
    });
}

/// A request as read off the socket: header block and body.
pub struct RawRequest {
    pub head: String,
    pub body: Vec<u8>,
}

impl RawRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_owned())
        })
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body must be JSON")
    }
}

/// Read one HTTP/1.1 request with a `Content-Length` body.
pub async fn read_request<S>(stream: &mut S) -> RawRequest
where
    S: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(end) = find_header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..end]).into_owned();
            let length = head
                .lines()
                .find_map(|line| {
                    let (key, value) = line.split_once(':')?;
                    key.trim()
                        .eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            let body_start = end + 4;
            if buf.len() >= body_start + length {
                return RawRequest {
                    head,
                    body: buf[body_start..body_start + length].to_vec(),
                };
            }
        }

        let n = stream.read(&mut chunk).await.expect("read request");
        assert!(n > 0, "peer closed before sending a full request");
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Serialize a complete `200 OK` response carrying `body`.
pub fn ok_response(body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
    .into_bytes()
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}
