#![allow(dead_code)]

//! Scripted transport for driving the retry client and fallback chain.

use async_trait::async_trait;
use kitchen_error::{UpstreamError, UpstreamErrorKind, UpstreamResult};
use kitchen_upstream::{Transport, UpstreamRequest, UpstreamResponse};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Respond with this status and body
    Status(u16, String),
    /// Fail at the connection level
    NetworkError(String),
    /// Never answer within `Duration`
    Hang(Duration),
}

impl MockReply {
    pub fn ok_json(body: serde_json::Value) -> Self {
        MockReply::Status(200, body.to_string())
    }

    pub fn status(status: u16) -> Self {
        MockReply::Status(status, format!("{{\"error\": {{\"code\": {}}}}}", status))
    }
}

/// Transport replaying scripted replies.
///
/// Replies are consumed in order; the last one repeats once the script runs
/// out. Every request URL is recorded.
#[derive(Debug, Clone)]
pub struct MockTransport {
    script: Arc<Mutex<VecDeque<MockReply>>>,
    last: Arc<Mutex<Option<MockReply>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            script: Arc::new(Mutex::new(replies.into())),
            last: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn always(reply: MockReply) -> Self {
        Self::new(vec![reply])
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn next_reply(&self) -> MockReply {
        let mut script = self.script.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        match script.pop_front() {
            Some(reply) => {
                *last = Some(reply.clone());
                reply
            }
            None => last
                .clone()
                .unwrap_or_else(|| MockReply::NetworkError("empty script".to_string())),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &UpstreamRequest) -> UpstreamResult<UpstreamResponse> {
        self.calls.lock().unwrap().push(request.url().clone());
        match self.next_reply() {
            MockReply::Status(status, body) => Ok(UpstreamResponse::new(status, body)),
            MockReply::NetworkError(message) => {
                Err(UpstreamError::new(UpstreamErrorKind::Transport(message)))
            }
            MockReply::Hang(duration) => {
                tokio::time::sleep(duration).await;
                Ok(UpstreamResponse::new(200, "{}"))
            }
        }
    }
}
