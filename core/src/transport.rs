//! Executes `HttpRequest` values against the network.
//!
//! The `Transport` trait is the single I/O seam of the crate. `ReqwestTransport`
//! is the production implementation; `mock::MockTransport` (feature `mock`)
//! scripts responses for tests. Non-2xx statuses are data, never errors:
//! status interpretation belongs to the services.

use async_trait::async_trait;
use thiserror::Error;

use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[cfg(any(test, feature = "mock"))]
pub mod mock;

/// The request never produced a response (DNS, connect, reset, body read).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Transport over a pooled `reqwest::Client`.
///
/// No request timeout is set; a hung request stays pending until its owner
/// drops the future.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.path);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(transport_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn transport_error(err: reqwest::Error) -> TransportError {
    TransportError(err.to_string())
}
