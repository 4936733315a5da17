//! Operations on `/metrics` and `/user/{id}/metrics`.
//!
//! Metrics responses are not wrapped in an envelope.

use crate::client::{Response, StrichlisteClient, NO_BODY};
use crate::error::ApiError;
use crate::http::{HttpMethod, Transport};
use crate::schema::{SystemMetrics, UserMetrics, ENDPOINT_METRICS, ENDPOINT_USER};
use crate::types::Id;

pub struct MetricsClient<'a, T> {
    client: &'a StrichlisteClient<T>,
}

impl<'a, T: Transport> MetricsClient<'a, T> {
    pub(crate) fn new(client: &'a StrichlisteClient<T>) -> Self {
        Self { client }
    }

    /// `GET /metrics`: server-wide totals and the last 30 days.
    pub fn system(&self) -> Result<Response<SystemMetrics>, ApiError> {
        self.client.send(HttpMethod::Get, ENDPOINT_METRICS, NO_BODY)
    }

    /// `GET /user/{id}/metrics`.
    pub fn user(&self, id: Id) -> Result<Response<UserMetrics>, ApiError> {
        let path = format!("{ENDPOINT_USER}/{id}{ENDPOINT_METRICS}");
        self.client.send(HttpMethod::Get, &path, NO_BODY)
    }
}
