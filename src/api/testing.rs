//! In-memory transport for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{ApiError, HttpReply, Transport};

/// Requests seen by a [`FakeTransport`], shared with the test after the
/// transport has been moved into a client.
#[derive(Debug, Clone, Default)]
pub(crate) struct RequestLog {
    gets: Rc<RefCell<Vec<String>>>,
    posts: Rc<RefCell<Vec<(String, serde_json::Value)>>>,
}

impl RequestLog {
    pub(crate) fn gets(&self) -> Vec<String> {
        self.gets.borrow().clone()
    }

    pub(crate) fn posts(&self) -> Vec<(String, serde_json::Value)> {
        self.posts.borrow().clone()
    }
}

/// Canned replies keyed by URL. Unrouted URLs fail like a refused connection.
///
/// GET routes hold a queue: each request consumes the front reply until only
/// the last one is left, which then repeats.
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    get_routes: RefCell<HashMap<String, Vec<HttpReply>>>,
    post_routes: HashMap<String, HttpReply>,
    log: RequestLog,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_get(self, url: &str, reply: HttpReply) -> Self {
        self.get_routes
            .borrow_mut()
            .insert(url.to_string(), vec![reply]);
        self
    }

    /// Queue a reply served after the ones already routed for `url`.
    pub(crate) fn then_get(self, url: &str, reply: HttpReply) -> Self {
        self.get_routes
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push(reply);
        self
    }

    pub(crate) fn on_post(mut self, url: &str, reply: HttpReply) -> Self {
        self.post_routes.insert(url.to_string(), reply);
        self
    }

    pub(crate) fn log(&self) -> RequestLog {
        self.log.clone()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> Result<HttpReply, ApiError> {
        self.log.gets.borrow_mut().push(url.to_string());
        let mut routes = self.get_routes.borrow_mut();
        let replies = routes
            .get_mut(url)
            .filter(|replies| !replies.is_empty())
            .ok_or_else(|| ApiError::Transport(format!("connection refused: {url}")))?;
        if replies.len() > 1 {
            Ok(replies.remove(0))
        } else {
            Ok(replies[0].clone())
        }
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpReply, ApiError> {
        self.log
            .posts
            .borrow_mut()
            .push((url.to_string(), body.clone()));
        self.post_routes
            .get(url)
            .cloned()
            .ok_or_else(|| ApiError::Transport(format!("connection refused: {url}")))
    }
}

/// Entities body in the service's wire shape.
pub(crate) fn entities_body(category: &str, entries: &[(&str, i64)]) -> String {
    let list: Vec<serde_json::Value> = entries
        .iter()
        .map(|(label, value)| serde_json::json!({ "label": label, "value": value }))
        .collect();
    let mut body = serde_json::Map::new();
    body.insert(category.to_string(), serde_json::Value::Array(list));
    serde_json::Value::Object(body).to_string()
}
