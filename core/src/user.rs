//! Operations on `/user`.

use crate::client::{Response, StrichlisteClient, NO_BODY};
use crate::error::ApiError;
use crate::http::{HttpMethod, Transport};
use crate::query::{encode_segment, list_path, ListOpts};
use crate::schema::{
    MultiUserResponse, SingleUserResponse, User, UserCreateRequest, UserUpdateRequest, ENDPOINT_USER,
    ENDPOINT_USER_SEARCH,
};
use crate::types::Id;

pub struct UserClient<'a, T> {
    client: &'a StrichlisteClient<T>,
}

impl<'a, T: Transport> UserClient<'a, T> {
    pub(crate) fn new(client: &'a StrichlisteClient<T>) -> Self {
        Self { client }
    }

    /// `POST /user`. Fails with `UserAlreadyExistsException` when the name is
    /// taken.
    pub fn create(&self, user: &UserCreateRequest) -> Result<Response<User>, ApiError> {
        let resp: Response<SingleUserResponse> = self.client.send(HttpMethod::Post, ENDPOINT_USER, Some(user))?;
        Ok(resp.map(|body| body.user))
    }

    /// `GET /user/{id}`.
    pub fn get(&self, id: Id) -> Result<Response<User>, ApiError> {
        self.get_by_segment(&id.to_string())
    }

    /// `GET /user/{name}`: the server accepts a name wherever it takes an id.
    pub fn get_by_name(&self, name: &str) -> Result<Response<User>, ApiError> {
        self.get_by_segment(&encode_segment(name))
    }

    /// `GET /user`: active and inactive users.
    pub fn list(&self, opts: Option<&ListOpts>) -> Result<Response<Vec<User>>, ApiError> {
        self.fetch_many(&list_path(ENDPOINT_USER, None, opts))
    }

    /// `GET /user/search?query=`: names matching or containing `query`.
    pub fn search(&self, query: &str, opts: Option<&ListOpts>) -> Result<Response<Vec<User>>, ApiError> {
        self.fetch_many(&list_path(ENDPOINT_USER_SEARCH, Some(("query", query)), opts))
    }

    /// `POST /user/{id}`.
    pub fn update(&self, id: Id, user: &UserUpdateRequest) -> Result<Response<User>, ApiError> {
        let path = format!("{ENDPOINT_USER}/{id}");
        let resp: Response<SingleUserResponse> = self.client.send(HttpMethod::Post, &path, Some(user))?;
        Ok(resp.map(|body| body.user))
    }

    /// Deactivate by posting `{"active": false}`; users are never deleted.
    pub fn deactivate(&self, id: Id) -> Result<Response<User>, ApiError> {
        self.update(
            id,
            &UserUpdateRequest {
                active: Some(false),
                ..Default::default()
            },
        )
    }

    fn get_by_segment(&self, segment: &str) -> Result<Response<User>, ApiError> {
        let path = format!("{ENDPOINT_USER}/{segment}");
        let resp: Response<SingleUserResponse> = self.client.send(HttpMethod::Get, &path, NO_BODY)?;
        Ok(resp.map(|body| body.user))
    }

    fn fetch_many(&self, path: &str) -> Result<Response<Vec<User>>, ApiError> {
        let resp: Response<MultiUserResponse> = self.client.send(HttpMethod::Get, path, NO_BODY)?;
        Ok(resp.map(|body| body.users))
    }
}
