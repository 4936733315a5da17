//! Blocking client for the strichliste v2 JSON API.
//!
//! # Overview
//! Typed operations on users, articles, transactions, settings and metrics,
//! each translated into one HTTP round trip against a configurable endpoint.
//!
//! # Design
//! - `StrichlisteClient` owns an immutable `ClientConfig` and a `Transport`;
//!   the bundled `UreqTransport` is used unless the `ureq` feature is off.
//! - Every operation builds an `HttpRequest` (`build_request`) and hands the
//!   buffered `HttpResponse` to the mediator (`parse_response`), which turns
//!   400-599 responses into `ApiError::Server` or `ApiError::Status` and
//!   decodes anything else into the expected type.
//! - Results are `Response<T>`: the decoded value plus the raw response.
//!   Errors derived from a response keep it too (`ApiError::response`).
//! - Nothing is cached or retried.

pub mod article;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod query;
pub mod schema;
pub mod settings;
pub mod transaction;
pub mod types;
pub mod user;

#[cfg(test)]
mod testing;

pub use client::{check_status, parse_response, Response, StrichlisteClient, NO_BODY};
pub use config::ClientConfig;
pub use error::{parse_error_class, ApiError, ErrorKind, ServerError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
#[cfg(feature = "ureq")]
pub use http::UreqTransport;
pub use query::ListOpts;
pub use schema::{
    Article, ArticleCreateRequest, ArticleUpdateRequest, Settings, SystemMetrics, Transaction,
    TransactionCreateRequest, TransactionKind, User, UserCreateRequest, UserMetrics, UserUpdateRequest,
};
pub use transaction::TransactionContext;
pub use types::{Currency, Id, Timestamp};
