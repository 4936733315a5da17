//! Construction-time client configuration.
//!
//! A `ClientConfig` is built once and handed to `StrichlisteClient::new`; the
//! client never mutates it. It derives `Deserialize` so a host application
//! can embed it in its own configuration file, with every field optional.

use serde::Deserialize;

/// Name the library reports in the default `User-Agent`.
pub const LIB_NAME: &str = env!("CARGO_PKG_NAME");
pub const LIB_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Server API revision this library is written against.
pub const API_VERSION: &str = "v2:1.6.0";
/// Public demo instance.
pub const DEFAULT_ENDPOINT: &str = "https://demo.strichliste.org/api";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every operation path is appended to, without trailing `/`.
    pub endpoint: String,
    pub app_name: String,
    pub app_version: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            app_name: LIB_NAME.to_string(),
            app_version: format!("{LIB_VERSION} (api:{API_VERSION})"),
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Identify the calling application in the `User-Agent` header.
    pub fn with_application(mut self, name: &str, version: &str) -> Self {
        self.app_name = name.to_string();
        self.app_version = version.to_string();
        self
    }

    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.app_name, self.app_version)
    }
}
