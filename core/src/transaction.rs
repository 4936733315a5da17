//! Operations on `/transaction` and `/user/{id}/transaction`.
//!
//! Transactions are always issued as a specific user, so creating, fetching
//! and reverting them goes through a `TransactionContext` bound to that user.
//! The context also carries a default comment applied to every transaction it
//! creates unless the request sets its own.

use crate::client::{Response, StrichlisteClient, NO_BODY};
use crate::error::ApiError;
use crate::http::{HttpMethod, Transport};
use crate::query::{list_path, ListOpts};
use crate::schema::{
    MultiTransactionResponse, SingleTransactionResponse, Transaction, TransactionCreateRequest,
    ENDPOINT_TRANSACTION, ENDPOINT_USER,
};
use crate::types::{Currency, Id};

pub struct TransactionClient<'a, T> {
    client: &'a StrichlisteClient<T>,
}

impl<'a, T: Transport> TransactionClient<'a, T> {
    pub(crate) fn new(client: &'a StrichlisteClient<T>) -> Self {
        Self { client }
    }

    /// Bind to `user` for issuing transactions.
    pub fn context(&self, user: Id) -> TransactionContext<'a, T> {
        TransactionContext {
            client: self.client,
            issuer: user,
            comment: None,
        }
    }

    /// `GET /transaction`: recent transactions of all users.
    pub fn list(&self, opts: Option<&ListOpts>) -> Result<Response<Vec<Transaction>>, ApiError> {
        let path = list_path(ENDPOINT_TRANSACTION, None, opts);
        let resp: Response<MultiTransactionResponse> = self.client.send(HttpMethod::Get, &path, NO_BODY)?;
        Ok(resp.map(|body| body.transactions))
    }
}

/// A user to issue transactions as, plus a reusable default comment.
pub struct TransactionContext<'a, T> {
    client: &'a StrichlisteClient<T>,
    issuer: Id,
    comment: Option<String>,
}

impl<T> Clone for TransactionContext<'_, T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client,
            issuer: self.issuer,
            comment: self.comment.clone(),
        }
    }
}

impl<'a, T: Transport> TransactionContext<'a, T> {
    pub fn issuer(&self) -> Id {
        self.issuer
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// A copy of this context using `comment` by default; `self` is unchanged.
    pub fn with_comment(&self, comment: &str) -> Self {
        Self {
            comment: Some(comment.to_string()),
            ..self.clone()
        }
    }

    /// `POST /user/{issuer}/transaction`.
    ///
    /// Possible server errors: `UserNotFoundException`,
    /// `ParameterMissingException`, `ParameterInvalidException`,
    /// `AccountBalanceBoundaryException`, `TransactionBoundaryException`,
    /// `ArticleNotFoundException`, `ArticleInactiveException`.
    pub fn create(&self, request: &TransactionCreateRequest) -> Result<Response<Transaction>, ApiError> {
        let path = self.user_path();
        let resp: Response<SingleTransactionResponse> = if request.comment.is_none() && self.comment.is_some() {
            let request = TransactionCreateRequest {
                comment: self.comment.clone(),
                ..request.clone()
            };
            self.client.send(HttpMethod::Post, &path, Some(&request))?
        } else {
            self.client.send(HttpMethod::Post, &path, Some(request))?
        };
        Ok(resp.map(|body| body.transaction))
    }

    /// Deposit (positive) or withdraw (negative) `amount`.
    pub fn delta(&self, amount: Currency) -> Result<Response<Transaction>, ApiError> {
        self.create(&TransactionCreateRequest {
            amount,
            ..Default::default()
        })
    }

    /// Buy `quantity` of an article at its current price.
    ///
    /// Fetches the article first, so this costs two round trips; a failed
    /// lookup is returned without attempting the purchase. A total outside
    /// the `i64` cent range is an `ApiError::InvalidRequest`.
    pub fn purchase(&self, article: Id, quantity: u32) -> Result<Response<Transaction>, ApiError> {
        let article = self.client.articles().get(article)?.data;
        let amount = article
            .price
            .checked_times(quantity)
            .and_then(Currency::checked_neg)
            .ok_or_else(|| {
                ApiError::InvalidRequest(format!(
                    "purchase total for {quantity} x {} overflows",
                    article.price
                ))
            })?;
        self.create(&TransactionCreateRequest {
            amount,
            article_id: Some(article.id),
            quantity: Some(quantity),
            ..Default::default()
        })
    }

    /// Move money to `recipient`. `amount` is signed from the issuer's side,
    /// so a transfer out is negative.
    pub fn transfer(&self, recipient: Id, amount: Currency) -> Result<Response<Transaction>, ApiError> {
        self.create(&TransactionCreateRequest {
            amount,
            recipient: Some(recipient),
            ..Default::default()
        })
    }

    /// `GET /user/{issuer}/transaction/{id}`.
    pub fn get(&self, id: Id) -> Result<Response<Transaction>, ApiError> {
        let path = format!("{}/{id}", self.user_path());
        let resp: Response<SingleTransactionResponse> = self.client.send(HttpMethod::Get, &path, NO_BODY)?;
        Ok(resp.map(|body| body.transaction))
    }

    /// `GET /user/{issuer}/transaction`.
    pub fn list(&self, opts: Option<&ListOpts>) -> Result<Response<Vec<Transaction>>, ApiError> {
        let path = list_path(&self.user_path(), None, opts);
        let resp: Response<MultiTransactionResponse> = self.client.send(HttpMethod::Get, &path, NO_BODY)?;
        Ok(resp.map(|body| body.transactions))
    }

    /// `DELETE /user/{issuer}/transaction/{id}`: revert and return the
    /// transaction. Fails with `TransactionNotDeletableException` outside the
    /// server's reversal policy; check `Transaction::is_reversible` first.
    pub fn revert(&self, id: Id) -> Result<Response<Transaction>, ApiError> {
        let path = format!("{}/{id}", self.user_path());
        let resp: Response<SingleTransactionResponse> = self.client.send(HttpMethod::Delete, &path, NO_BODY)?;
        Ok(resp.map(|body| body.transaction))
    }

    fn user_path(&self) -> String {
        format!("{ENDPOINT_USER}/{}{ENDPOINT_TRANSACTION}", self.issuer)
    }
}
