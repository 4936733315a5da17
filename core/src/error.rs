//! Error types for the strichliste client.
//!
//! # Design
//! The server reports failures as `{"error": {"class": .., "message": ..}}`
//! where `class` is a namespaced PHP exception such as
//! `App\Exception\UserNotFoundException`. Only the last path segment is kept,
//! so callers branch on `UserNotFoundException` and friends via
//! `ServerError::kind`.
//!
//! Error-range responses without a usable envelope still produce an error:
//! `ApiError::Status` carries just the status code. Every variant that
//! originates from a received response keeps that response for inspection.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::http::{HttpResponse, TransportError};

/// Separator between namespace segments in a server exception class.
pub const CLASS_SEPARATOR: char = '\\';

/// Strip the namespace from an exception class path.
///
/// `App\Exception\FooException` becomes `FooException`. A string without a
/// separator is returned as is; a trailing separator yields `""`.
pub fn parse_error_class(raw: &str) -> &str {
    match raw.rfind(CLASS_SEPARATOR) {
        Some(index) => &raw[index + CLASS_SEPARATOR.len_utf8()..],
        None => raw,
    }
}

/// Exception classes the server is known to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    AccountBalanceBoundary,
    ArticleBarcodeAlreadyExists,
    ArticleNotFound,
    ArticleInactive,
    ParameterInvalid,
    ParameterMissing,
    ParameterNotFound,
    TransactionBoundary,
    TransactionNotFound,
    TransactionNotDeletable,
    UserAlreadyExists,
    UserNotFound,
    Other(String),
}

impl ErrorKind {
    pub fn from_class(class: &str) -> Self {
        match class {
            "AccountBalanceBoundaryException" => ErrorKind::AccountBalanceBoundary,
            "ArticleBarcodeAlreadyExistsException" => ErrorKind::ArticleBarcodeAlreadyExists,
            "ArticleNotFoundException" => ErrorKind::ArticleNotFound,
            "ArticleInactiveException" => ErrorKind::ArticleInactive,
            "ParameterInvalidException" => ErrorKind::ParameterInvalid,
            "ParameterMissingException" => ErrorKind::ParameterMissing,
            "ParameterNotFoundException" => ErrorKind::ParameterNotFound,
            "TransactionBoundaryException" => ErrorKind::TransactionBoundary,
            "TransactionNotFoundException" => ErrorKind::TransactionNotFound,
            "TransactionNotDeletableException" => ErrorKind::TransactionNotDeletable,
            "UserAlreadyExistsException" => ErrorKind::UserAlreadyExists,
            "UserNotFoundException" => ErrorKind::UserNotFound,
            other => ErrorKind::Other(other.to_string()),
        }
    }
}

/// A typed error reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    /// Exception class with the namespace stripped, e.g. `UserNotFoundException`.
    pub class: String,
    pub message: String,
}

impl ServerError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from_class(&self.class)
    }

    /// Build from the raw envelope fields. Returns `None` when the class is
    /// empty after stripping; an empty message is replaced by the class.
    pub fn from_parts(raw_class: &str, message: &str) -> Option<Self> {
        let class = parse_error_class(raw_class);
        if class.is_empty() {
            return None;
        }
        let message = if message.is_empty() { class } else { message };
        Some(Self {
            class: class.to_string(),
            message: message.to_string(),
        })
    }

    /// Decode `{"error": {"class", "message"}}`. Anything unusable yields
    /// `None` so the caller can fall back to a status-code error.
    pub fn from_body(body: &str) -> Option<Self> {
        let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
        Self::from_parts(&envelope.error.class, &envelope.error.message)
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ServerError {}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

// The body also carries a numeric `code`, but the server answers with its own
// HTTP status regardless and `class` already identifies the error.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    class: String,
    #[serde(default)]
    message: String,
}

/// Errors returned by `StrichlisteClient` and the operation wrappers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Endpoint, path or query did not form a valid URL.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// The server answered 400-599 with a decodable error envelope.
    #[error("{error}")]
    Server {
        error: ServerError,
        response: HttpResponse,
    },

    /// The server answered 400-599 without a usable error envelope.
    #[error("{app_name}: server responded with status code {status}")]
    Status {
        status: u16,
        app_name: String,
        response: HttpResponse,
    },

    /// A success response did not match the expected shape.
    #[error("deserialization failed: {source}")]
    Deserialization {
        source: serde_json::Error,
        response: HttpResponse,
    },
}

impl ApiError {
    /// The raw response, when the error came from one.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ApiError::Server { response, .. }
            | ApiError::Status { response, .. }
            | ApiError::Deserialization { response, .. } => Some(response),
            ApiError::Serialization(_) | ApiError::InvalidRequest(_) | ApiError::Transport(_) => {
                None
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(|response| response.status)
    }

    pub fn server_error(&self) -> Option<&ServerError> {
        match self {
            ApiError::Server { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Kind of the typed server error, if this is one.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.server_error().map(ServerError::kind)
    }
}
