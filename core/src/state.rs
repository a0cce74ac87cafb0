//! Request lifecycle model.
//!
//! `RequestState` is the one value every screen renders from. A request
//! sequence built by [`request_stream`] always yields `Loading` first and then
//! exactly one terminal value, and is lazy: nothing runs until the stream is
//! polled. Calling the producing operation again builds a fresh stream.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};

use crate::error::ApiError;

/// Lifecycle of one asynchronous fetch or mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState<T> {
    /// No request has been made yet, or the state was explicitly reset.
    Idle,
    /// A request is in flight.
    Loading,
    /// Terminal: the fetched or mutated value.
    Success(T),
    /// Terminal: a human-readable cause.
    Error(String),
}

impl<T> RequestState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, RequestState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestState::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RequestState::Error(_))
    }

    /// `Success` and `Error` end a request attempt.
    pub fn is_terminal(&self) -> bool {
        self.is_success() || self.is_error()
    }

    pub fn success_data(&self) -> Option<&T> {
        match self {
            RequestState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            RequestState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> RequestState<U> {
        match self {
            RequestState::Idle => RequestState::Idle,
            RequestState::Loading => RequestState::Loading,
            RequestState::Success(data) => RequestState::Success(f(data)),
            RequestState::Error(message) => RequestState::Error(message),
        }
    }
}

impl<T> From<Result<T, ApiError>> for RequestState<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => RequestState::Success(data),
            Err(err) => RequestState::Error(err.to_string()),
        }
    }
}

/// A lazy, finite sequence of states for one request attempt.
pub type RequestStream<T> = Pin<Box<dyn Stream<Item = RequestState<T>> + Send + 'static>>;

/// Build a request sequence: `Loading`, then the outcome of `call`.
///
/// `call` is not invoked until the stream is polled past `Loading`. When
/// `min_loading` is non-zero it is awaited before issuing the call so the
/// loading state stays visible for at least that long.
pub fn request_stream<T, F, Fut>(min_loading: Duration, call: F) -> RequestStream<T>
where
    T: Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let terminal = stream::once(async move {
        if !min_loading.is_zero() {
            tokio::time::sleep(min_loading).await;
        }
        RequestState::from(call().await)
    });
    stream::once(async { RequestState::Loading })
        .chain(terminal)
        .boxed()
}
