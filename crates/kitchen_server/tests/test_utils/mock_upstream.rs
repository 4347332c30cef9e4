//! URL-routed fake of the generative API.

use async_trait::async_trait;
use kitchen_error::{UpstreamError, UpstreamErrorKind, UpstreamResult};
use kitchen_upstream::{Transport, UpstreamRequest, UpstreamResponse};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One scripted upstream outcome.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with this status and body
    Status(u16, String),
    /// Fail at the connection level
    NetworkError(String),
}

impl Reply {
    pub fn json(body: Value) -> Self {
        Reply::Status(200, body.to_string())
    }

    pub fn status(status: u16) -> Self {
        Reply::Status(status, format!("{{\"error\": {{\"code\": {}}}}}", status))
    }

    /// A `generateContent` answer whose first part is `text`.
    pub fn gemini_text(text: &str) -> Self {
        Reply::json(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }))
    }

    /// An Imagen `predict` answer carrying one image.
    pub fn imagen_image(base64: &str) -> Self {
        Reply::json(json!({
            "predictions": [{ "bytesBase64Encoded": base64, "mimeType": "image/png" }]
        }))
    }
}

#[derive(Debug)]
struct Route {
    url_fragment: String,
    replies: VecDeque<Reply>,
    last: Option<Reply>,
}

/// Transport answering by URL fragment.
///
/// Each route replays its replies in order and repeats the last one. A URL
/// matching no route gets a 404. Every request URL is recorded.
#[derive(Debug, Clone, Default)]
pub struct MockUpstream {
    routes: Arc<Mutex<Vec<Route>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, url_fragment: &str, replies: Vec<Reply>) -> Self {
        self.routes.lock().unwrap().push(Route {
            url_fragment: url_fragment.to_string(),
            replies: replies.into(),
            last: None,
        });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url_fragment: &str) -> usize {
        self.calls()
            .iter()
            .filter(|url| url.contains(url_fragment))
            .count()
    }

    fn next_reply(&self, url: &str) -> Reply {
        let mut routes = self.routes.lock().unwrap();
        let Some(route) = routes.iter_mut().find(|r| url.contains(&r.url_fragment)) else {
            return Reply::status(404);
        };
        match route.replies.pop_front() {
            Some(reply) => {
                route.last = Some(reply.clone());
                reply
            }
            None => route.last.clone().unwrap_or_else(|| Reply::status(404)),
        }
    }
}

#[async_trait]
impl Transport for MockUpstream {
    async fn send(&self, request: &UpstreamRequest) -> UpstreamResult<UpstreamResponse> {
        self.calls.lock().unwrap().push(request.url().clone());
        match self.next_reply(request.url()) {
            Reply::Status(status, body) => Ok(UpstreamResponse::new(status, body)),
            Reply::NetworkError(message) => {
                Err(UpstreamError::new(UpstreamErrorKind::Transport(message)))
            }
        }
    }
}
