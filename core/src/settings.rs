//! Operations on `/settings`.

use crate::client::{Response, StrichlisteClient, NO_BODY};
use crate::error::ApiError;
use crate::http::{HttpMethod, Transport};
use crate::schema::{Settings, SettingsResponse, ENDPOINT_SETTINGS};

pub struct SettingsClient<'a, T> {
    client: &'a StrichlisteClient<T>,
}

impl<'a, T: Transport> SettingsClient<'a, T> {
    pub(crate) fn new(client: &'a StrichlisteClient<T>) -> Self {
        Self { client }
    }

    /// `GET /settings`.
    pub fn get(&self) -> Result<Response<Settings>, ApiError> {
        let resp: Response<SettingsResponse> = self.client.send(HttpMethod::Get, ENDPOINT_SETTINGS, NO_BODY)?;
        Ok(resp.map(|body| body.settings))
    }
}
