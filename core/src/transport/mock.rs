//! Scripted transport for tests.
//!
//! Replies are registered per method and URL path (query string ignored) and
//! consumed in order; the last reply for a route is sticky so a refresh after
//! a mutation keeps getting an answer. Every executed request is recorded,
//! headers included, so tests can assert on the bearer token actually sent.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{Transport, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[derive(Debug, Clone)]
enum MockReply {
    Respond(HttpResponse),
    Fail(String),
    Hang,
}

#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<MockReply>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an HTTP response for `method path`.
    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: &str) -> &Self {
        self.push(method, path, MockReply::Respond(HttpResponse::new(status, body)))
    }

    /// Queue a transport failure (no response at all).
    pub fn fail(&self, method: HttpMethod, path: &str, cause: &str) -> &Self {
        self.push(method, path, MockReply::Fail(cause.to_string()))
    }

    /// Queue a request that never completes.
    pub fn hang(&self, method: HttpMethod, path: &str) -> &Self {
        self.push(method, path, MockReply::Hang)
    }

    /// Every request executed so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Number of executed requests for `method path`.
    pub fn call_count(&self, method: HttpMethod, path: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|req| req.method == method && url_path(&req.path) == path)
            .count()
    }

    fn push(&self, method: HttpMethod, path: &str, reply: MockReply) -> &Self {
        lock(&self.routes)
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    fn next_reply(&self, method: HttpMethod, path: &str) -> Option<MockReply> {
        let mut routes = lock(&self.routes);
        let queue = routes.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = request.method;
        let path = url_path(&request.path).to_string();
        lock(&self.requests).push(request);

        match self.next_reply(method, &path) {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Fail(cause)) => Err(TransportError(cause)),
            Some(MockReply::Hang) => std::future::pending().await,
            None => Err(TransportError(format!("no mock route for {method} {path}"))),
        }
    }
}

/// The path component of a full URL, without the query string.
fn url_path(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme
        .find('/')
        .map_or("/", |idx| &without_scheme[idx..]);
    path.split_once('?').map_or(path, |(path, _)| path)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
