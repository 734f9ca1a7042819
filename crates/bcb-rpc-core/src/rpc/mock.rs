use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::RpcError;

use super::{HttpReply, Transport};

/// Transport double that records every request body (parsed as JSON) and
/// replays canned replies in order. Clones share state.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    requests: Vec<serde_json::Value>,
    replies: VecDeque<HttpReply>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, status: u16, body: &str) {
        self.state
            .lock()
            .expect("mock state lock")
            .replies
            .push_back(HttpReply {
                status,
                body: body.as_bytes().to_vec(),
            });
    }

    pub fn requests(&self) -> Vec<serde_json::Value> {
        self.state.lock().expect("mock state lock").requests.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, body: Vec<u8>) -> Result<HttpReply, RpcError> {
        let mut state = self.state.lock().expect("mock state lock");
        let request = serde_json::from_slice(&body).expect("client must send JSON");
        state.requests.push(request);
        Ok(state.replies.pop_front().expect("no canned reply left"))
    }
}
