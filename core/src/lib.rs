//! Client core for the Goiaba content backend.
//!
//! # Overview
//! Every screen renders from a [`RequestState`]: `Idle`, `Loading`, or one
//! terminal `Success`/`Error`. Repositories expose each backend operation as
//! a lazy [`RequestStream`] that yields `Loading` and then the outcome, and
//! view-models mirror those streams into observable holders.
//!
//! # Design
//! - Services keep the request/response split: `build_*` produces a plain
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`. Only the
//!   [`Transport`] touches the network, so everything above it can be driven
//!   by the scripted `transport::mock::MockTransport` (feature `mock`).
//! - Status codes become typed [`ApiError`]s inside the crate; past the
//!   repository boundary they are just `RequestState::Error(message)`.
//! - The session token lives in an injectable [`AuthState`] read when each
//!   request is built.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod lenient;
pub mod logging;
pub mod repository;
pub mod service;
pub mod state;
pub mod transport;
pub mod types;
pub mod viewmodel;

pub use auth::AuthState;
pub use client::ApiClient;
pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use repository::{
    AuthRepository, AuthRepositoryImpl, PostRepository, PostRepositoryImpl, ProfileRepository,
    ProfileRepositoryImpl,
};
pub use state::{request_stream, RequestState, RequestStream};
pub use transport::{ReqwestTransport, Transport, TransportError};
pub use types::{Post, PostsResponse, SinglePostResponse, UsersMeResponse};
