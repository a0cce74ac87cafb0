//! Service layer: one type per resource family.
//!
//! Each operation is split into a `build_*` method producing an
//! `HttpRequest`, a `parse_*` method turning an `HttpResponse` into
//! `Result<T, ApiError>`, and an async method running both through the
//! shared `ApiClient`. Status interpretation lives in [`check_status`], fed
//! with the per-operation table.

pub mod posts;
pub mod profile;

pub use posts::PostsService;
pub use profile::ProfileService;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::lenient::decode;

/// How one operation interprets status codes. 401 is always
/// `Unauthorized`; codes without an entry fall through to `HTTP <code>`.
#[derive(Debug, Clone)]
pub(crate) struct StatusMap {
    success: &'static [u16],
    not_found: Option<String>,
    bad_request: Option<&'static str>,
    server_error: bool,
}

impl StatusMap {
    pub(crate) fn success(codes: &'static [u16]) -> Self {
        Self {
            success: codes,
            not_found: None,
            bad_request: None,
            server_error: false,
        }
    }

    pub(crate) fn not_found(mut self, message: impl Into<String>) -> Self {
        self.not_found = Some(message.into());
        self
    }

    pub(crate) fn bad_request(mut self, message: &'static str) -> Self {
        self.bad_request = Some(message);
        self
    }

    pub(crate) fn server_error(mut self) -> Self {
        self.server_error = true;
        self
    }
}

/// Map a response status to `Ok(())` or the operation's `ApiError`.
pub(crate) fn check_status(response: &HttpResponse, map: &StatusMap) -> Result<(), ApiError> {
    let status = response.status;
    if map.success.contains(&status) {
        return Ok(());
    }
    let err = match (status, &map.not_found, map.bad_request) {
        (401, _, _) => ApiError::Unauthorized,
        (404, Some(message), _) => ApiError::NotFound(message.clone()),
        (400, _, Some(message)) => ApiError::BadRequest(message.to_string()),
        (500, _, _) if map.server_error => ApiError::ServerError,
        _ => ApiError::http(status),
    };
    warn!(status, error = %err, "request rejected");
    Err(err)
}

/// `check_status` then decode the body.
pub(crate) fn parse_body<T: DeserializeOwned>(
    response: &HttpResponse,
    map: &StatusMap,
) -> Result<T, ApiError> {
    check_status(response, map)?;
    decode(&response.body).inspect_err(|err| warn!(error = %err, "undecodable response body"))
}
