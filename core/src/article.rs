//! Operations on `/article`.

use crate::client::{Response, StrichlisteClient, NO_BODY};
use crate::error::ApiError;
use crate::http::{HttpMethod, Transport};
use crate::query::{list_path, ListOpts};
use crate::schema::{
    Article, ArticleCreateRequest, ArticleUpdateRequest, MultiArticleResponse, SingleArticleResponse,
    ENDPOINT_ARTICLE, ENDPOINT_ARTICLE_SEARCH,
};
use crate::types::Id;

pub struct ArticleClient<'a, T> {
    client: &'a StrichlisteClient<T>,
}

impl<'a, T: Transport> ArticleClient<'a, T> {
    pub(crate) fn new(client: &'a StrichlisteClient<T>) -> Self {
        Self { client }
    }

    /// `POST /article`. Fails with `ParameterMissingException` /
    /// `ParameterInvalidException` / `ArticleBarcodeAlreadyExistsException`.
    pub fn create(&self, article: &ArticleCreateRequest) -> Result<Response<Article>, ApiError> {
        let resp: Response<SingleArticleResponse> =
            self.client.send(HttpMethod::Post, ENDPOINT_ARTICLE, Some(article))?;
        Ok(resp.map(|body| body.article))
    }

    /// `GET /article/{id}`.
    pub fn get(&self, id: Id) -> Result<Response<Article>, ApiError> {
        let path = format!("{ENDPOINT_ARTICLE}/{id}");
        let resp: Response<SingleArticleResponse> = self.client.send(HttpMethod::Get, &path, NO_BODY)?;
        Ok(resp.map(|body| body.article))
    }

    /// `GET /article`: active and inactive articles.
    pub fn list(&self, opts: Option<&ListOpts>) -> Result<Response<Vec<Article>>, ApiError> {
        let path = list_path(ENDPOINT_ARTICLE, None, opts);
        self.fetch_many(&path)
    }

    /// `GET /article/search?query=`: names matching or containing `name`.
    pub fn search_by_name(&self, name: &str, opts: Option<&ListOpts>) -> Result<Response<Vec<Article>>, ApiError> {
        let path = list_path(ENDPOINT_ARTICLE_SEARCH, Some(("query", name)), opts);
        self.fetch_many(&path)
    }

    /// `GET /article/search?barcode=`.
    pub fn search_by_barcode(
        &self,
        barcode: &str,
        opts: Option<&ListOpts>,
    ) -> Result<Response<Vec<Article>>, ApiError> {
        let path = list_path(ENDPOINT_ARTICLE_SEARCH, Some(("barcode", barcode)), opts);
        self.fetch_many(&path)
    }

    /// `POST /article/{id}`.
    ///
    /// The server may keep the article and change it, or deactivate it and
    /// return a replacement whose `precursor` is the old version. Compare the
    /// returned id with `id` to tell which happened.
    pub fn update(&self, id: Id, article: &ArticleUpdateRequest) -> Result<Response<Article>, ApiError> {
        let path = format!("{ENDPOINT_ARTICLE}/{id}");
        let resp: Response<SingleArticleResponse> = self.client.send(HttpMethod::Post, &path, Some(article))?;
        Ok(resp.map(|body| body.article))
    }

    /// `DELETE /article/{id}`: deactivates and returns the article. Articles
    /// are never actually deleted.
    pub fn deactivate(&self, id: Id) -> Result<Response<Article>, ApiError> {
        let path = format!("{ENDPOINT_ARTICLE}/{id}");
        let resp: Response<SingleArticleResponse> = self.client.send(HttpMethod::Delete, &path, NO_BODY)?;
        Ok(resp.map(|body| body.article))
    }

    fn fetch_many(&self, path: &str) -> Result<Response<Vec<Article>>, ApiError> {
        let resp: Response<MultiArticleResponse> = self.client.send(HttpMethod::Get, path, NO_BODY)?;
        Ok(resp.map(|body| body.articles))
    }
}
