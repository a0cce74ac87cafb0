//! Shared HTTP client for the content API.
//!
//! # Design
//! `ApiClient` holds the base URL, the shared `AuthState` and a `Transport`.
//! It is cheap to clone and one instance is shared by every service. Request
//! building and execution are split: `build` produces a plain `HttpRequest`
//! with the default headers and the bearer token as it is *now*; `execute`
//! hands it to the transport. A token change therefore affects only requests
//! built after it.

use std::sync::Arc;

use tracing::debug;

use crate::auth::AuthState;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};

const CONTENT_TYPE: &str = "application/json";

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    auth: Arc<AuthState>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("logged_in", &self.auth.is_logged_in())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, auth: Arc<AuthState>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            transport,
        }
    }

    /// Client over the default reqwest transport. A token in `config`
    /// replaces whatever `auth` currently holds.
    pub fn from_config(config: &ApiConfig, auth: Arc<AuthState>) -> Self {
        if let Some(token) = &config.token {
            auth.set_token(token.clone());
        }
        Self::new(&config.base_url, auth, Arc::new(ReqwestTransport::new()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &Arc<AuthState> {
        &self.auth
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.auth.set_token(token);
    }

    pub fn clear_token(&self) {
        self.auth.clear_token();
    }

    /// Full URL for an endpoint path relative to the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn build(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let mut headers = vec![("content-type".to_string(), CONTENT_TYPE.to_string())];
        if let Some(token) = self.auth.token() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        HttpRequest {
            method,
            path: self.url(path),
            headers,
            body,
        }
    }

    /// Serialize `payload` as the request body.
    pub fn build_json<B: serde::Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::serialization(e.to_string()))?;
        Ok(self.build(method, path, Some(body)))
    }

    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method;
        let url = request.path.clone();
        let authorized = request.header("authorization").is_some();
        debug!(%method, %url, authorized, "sending request");

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| ApiError::transport(e.0))?;

        debug!(%method, %url, status = response.status, "received response");
        Ok(response)
    }
}
