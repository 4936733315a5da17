//! Request building and response mediation for the strichliste API.
//!
//! # Design
//! `StrichlisteClient` holds an immutable `ClientConfig` and a `Transport`.
//! Every operation goes through the same two steps:
//!
//! 1. `build_request` turns a method, a path (query string included) and an
//!    optional payload into an `HttpRequest` with the fixed JSON headers and
//!    the configured `User-Agent`. Failures here are local; nothing has been
//!    sent.
//! 2. `execute` performs exactly one round trip and hands the buffered
//!    response to `parse_response`, which classifies the status: 400-599
//!    becomes `ApiError::Server` when the body is a JSON error envelope and
//!    `ApiError::Status` otherwise; anything else is decoded into the
//!    caller's type.
//!
//! Classification is a pure function of the response so it can be tested
//! without a network. There is no retry; the caller decides what to do with
//! an error, and the raw response travels with every result.

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::article::ArticleClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ServerError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::metrics::MetricsClient;
use crate::settings::SettingsClient;
use crate::transaction::TransactionClient;
use crate::user::UserClient;

/// Placeholder payload type for requests without a body.
pub const NO_BODY: Option<&()> = None;

/// A decoded result together with the response it came from.
#[derive(Debug, Clone)]
pub struct Response<T> {
    pub data: T,
    pub raw: HttpResponse,
}

impl<T> Response<T> {
    pub fn into_inner(self) -> T {
        self.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            data: f(self.data),
            raw: self.raw,
        }
    }
}

/// Blocking client for a strichliste server.
#[derive(Debug, Clone)]
pub struct StrichlisteClient<T> {
    config: ClientConfig,
    user_agent: String,
    transport: T,
}

#[cfg(feature = "ureq")]
impl StrichlisteClient<crate::http::UreqTransport> {
    /// Client for `config` using the bundled ureq transport.
    pub fn with_config(config: ClientConfig) -> Self {
        Self::new(config, crate::http::UreqTransport::new())
    }
}

impl<T: Transport> StrichlisteClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        let config = ClientConfig {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            ..config
        };
        let user_agent = config.user_agent();
        Self {
            config,
            user_agent,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn articles(&self) -> ArticleClient<'_, T> {
        ArticleClient::new(self)
    }

    pub fn users(&self) -> UserClient<'_, T> {
        UserClient::new(self)
    }

    pub fn transactions(&self) -> TransactionClient<'_, T> {
        TransactionClient::new(self)
    }

    pub fn settings(&self) -> SettingsClient<'_, T> {
        SettingsClient::new(self)
    }

    pub fn metrics(&self) -> MetricsClient<'_, T> {
        MetricsClient::new(self)
    }

    /// Build a request for `path` (which may carry a query string) relative
    /// to the configured endpoint.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError> {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(ApiError::Serialization)?;

        let url = format!("{}{path}", self.config.endpoint);
        // the URL parser tolerates blanks and drops tabs and newlines
        if url.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ApiError::InvalidRequest(format!(
                "{url:?}: whitespace or control character in URL"
            )));
        }
        let url = Url::parse(&url)
            .map_err(|e| ApiError::InvalidRequest(format!("{url}: {e}")))?
            .to_string();

        Ok(HttpRequest {
            method,
            url,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), self.user_agent.clone()),
            ],
            body,
        })
    }

    /// Perform one round trip and decode a success body into `R`.
    pub fn execute<R: DeserializeOwned>(&self, request: &HttpRequest) -> Result<Response<R>, ApiError> {
        let response = self.round_trip(request)?;
        parse_response(&self.config.app_name, response)
    }

    /// Perform one round trip, classifying the status but not decoding a
    /// success body.
    pub fn execute_unit(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let response = self.round_trip(request)?;
        check_status(&self.config.app_name, response)
    }

    /// Build and execute in one go; what the operation wrappers use.
    pub fn send<B, R>(&self, method: HttpMethod, path: &str, body: Option<&B>) -> Result<Response<R>, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.build_request(method, path, body)?;
        self.execute(&request)
    }

    fn round_trip(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(request).map_err(ApiError::Transport)?;
        tracing::debug!(
            status = response.status,
            bytes = response.body.len(),
            "received response"
        );
        Ok(response)
    }
}

/// Map an error-range status to `ApiError`, passing other responses through.
///
/// The envelope is only decoded when the response declares JSON; otherwise,
/// or when the envelope has no class, the result is `ApiError::Status`.
pub fn check_status(app_name: &str, response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if !response.is_error() {
        return Ok(response);
    }

    let typed = if response.is_json() {
        ServerError::from_body(&response.body)
    } else {
        None
    };

    match typed {
        Some(error) => {
            tracing::warn!(
                status = response.status,
                class = %error.class,
                message = %error.message,
                "server reported error"
            );
            Err(ApiError::Server { error, response })
        }
        None => {
            tracing::warn!(status = response.status, "server error without usable envelope");
            Err(ApiError::Status {
                status: response.status,
                app_name: app_name.to_string(),
                response,
            })
        }
    }
}

/// Classify `response` and decode a success body into `R`.
pub fn parse_response<R: DeserializeOwned>(app_name: &str, response: HttpResponse) -> Result<Response<R>, ApiError> {
    let response = check_status(app_name, response)?;
    match serde_json::from_str(&response.body) {
        Ok(data) => Ok(Response { data, raw: response }),
        Err(source) => Err(ApiError::Deserialization { source, response }),
    }
}
