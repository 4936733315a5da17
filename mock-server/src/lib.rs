//! In-memory strichliste v2 API for integration tests.
//!
//! Implements the routes the client uses with the server's envelopes and
//! error format (`{"error": {"class": "App\\Exception\\..", ..}}`), plus
//! enough business rules (balance boundaries, barcode uniqueness, article
//! replacement on update, reversal) to produce every error class the client
//! distinguishes. Wire DTOs are defined here independently of the client.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";
const ACCOUNT_LOWER: i64 = -20_000;
const ACCOUNT_UPPER: i64 = 20_000;
const PAYMENT_LOWER: i64 = -2_000;
const PAYMENT_UPPER: i64 = 15_000;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub active: bool,
    #[serde(rename = "mailAddress")]
    pub mail_address: Option<String>,
    pub balance: i64,
    pub created: String,
    pub updated: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub name: String,
    pub amount: i64,
    pub barcode: Option<String>,
    pub active: bool,
    pub precursor: Option<Box<Article>>,
    pub created: String,
    #[serde(rename = "usageCount")]
    pub usage_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    pub user: User,
    pub article: Option<Article>,
    pub sender: Option<User>,
    pub recipient: Option<User>,
    pub quantity: Option<u32>,
    pub comment: Option<String>,
    pub amount: i64,
    pub deleted: bool,
    #[serde(rename = "isDeletable")]
    pub is_deletable: bool,
    pub created: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: Option<String>,
    #[serde(rename = "mailAddress")]
    pub mail_address: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    #[serde(rename = "mailAddress")]
    pub mail_address: Option<String>,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateArticle {
    pub name: Option<String>,
    pub amount: Option<i64>,
    pub barcode: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateTransaction {
    pub amount: Option<i64>,
    pub comment: Option<String>,
    pub recipient: Option<u64>,
    #[serde(rename = "articleId")]
    pub article_id: Option<u64>,
    pub quantity: Option<u32>,
}

#[derive(Deserialize, Default)]
pub struct ListParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub query: Option<String>,
    pub barcode: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// An error rendered the way the real server does.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub class: &'static str,
    pub message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, class: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            class,
            message: message.into(),
        }
    }

    fn user_not_found(user: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "UserNotFoundException", format!("User '{user}' not found"))
    }

    fn article_not_found(id: u64) -> Self {
        Self::new(StatusCode::NOT_FOUND, "ArticleNotFoundException", format!("Article '{id}' not found"))
    }

    fn transaction_not_found(id: u64) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "TransactionNotFoundException",
            format!("Transaction '{id}' not found"),
        )
    }

    fn parameter_missing(name: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "ParameterMissingException",
            format!("Parameter '{name}' is missing"),
        )
    }

    fn parameter_invalid(name: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "ParameterInvalidException",
            format!("Parameter '{name}' is invalid"),
        )
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        tracing::debug!(class = self.class, message = %self.message, "rejecting request");
        let body = json!({
            "error": {
                "class": format!("App\\Exception\\{}", self.class),
                "code": self.status.as_u16(),
                "message": self.message,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiFailure>;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
struct ArticleRecord {
    id: u64,
    name: String,
    amount: i64,
    barcode: Option<String>,
    active: bool,
    precursor: Option<u64>,
    created: String,
    usage_count: u64,
}

#[derive(Clone, Debug)]
struct TransactionRecord {
    id: u64,
    user: u64,
    article: Option<u64>,
    sender: Option<u64>,
    recipient: Option<u64>,
    quantity: Option<u32>,
    comment: Option<String>,
    amount: i64,
    deleted: bool,
    created: String,
    /// The counterpart booking of a transfer.
    mirror: Option<u64>,
}

#[derive(Debug, Default)]
pub struct Store {
    users: BTreeMap<u64, User>,
    articles: BTreeMap<u64, ArticleRecord>,
    transactions: BTreeMap<u64, TransactionRecord>,
    next_user: u64,
    next_article: u64,
    next_transaction: u64,
}

fn now() -> String {
    Utc::now().format(TIMESTAMP_LAYOUT).to_string()
}

fn next_id(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

fn paginate<T: Clone>(items: &[T], params: &ListParams) -> Vec<T> {
    let limit = params.limit.filter(|limit| *limit > 0);
    let skip = match (params.page, limit) {
        (Some(page), Some(limit)) if page > 0 => (page - 1).saturating_mul(limit),
        _ => 0,
    };
    let take = limit.unwrap_or(usize::MAX);
    items.iter().skip(skip).take(take).cloned().collect()
}

impl Store {
    fn find_user(&self, key: &str) -> Result<&User, ApiFailure> {
        let found = match key.parse::<u64>() {
            Ok(id) => self.users.get(&id),
            Err(_) => self.users.values().find(|user| user.name == key),
        };
        found.ok_or_else(|| ApiFailure::user_not_found(key))
    }

    fn user_id(&self, key: &str) -> Result<u64, ApiFailure> {
        self.find_user(key).map(|user| user.id)
    }

    fn render_article(&self, id: u64) -> Option<Article> {
        let record = self.articles.get(&id)?;
        Some(Article {
            id: record.id,
            name: record.name.clone(),
            amount: record.amount,
            barcode: record.barcode.clone(),
            active: record.active,
            precursor: record
                .precursor
                .and_then(|old| self.render_article(old))
                .map(Box::new),
            created: record.created.clone(),
            usage_count: record.usage_count,
        })
    }

    fn render_transaction(&self, record: &TransactionRecord) -> Option<Transaction> {
        Some(Transaction {
            id: record.id,
            user: self.users.get(&record.user)?.clone(),
            article: record.article.and_then(|id| self.render_article(id)),
            sender: record.sender.and_then(|id| self.users.get(&id).cloned()),
            recipient: record.recipient.and_then(|id| self.users.get(&id).cloned()),
            quantity: record.quantity,
            comment: record.comment.clone(),
            amount: record.amount,
            deleted: record.deleted,
            is_deletable: !record.deleted,
            created: record.created.clone(),
        })
    }

    fn render_transactions<'a>(&self, records: impl Iterator<Item = &'a TransactionRecord>) -> Vec<Transaction> {
        records.filter_map(|record| self.render_transaction(record)).collect()
    }

    fn barcode_taken(&self, barcode: &str, except: Option<u64>) -> bool {
        self.articles.values().any(|article| {
            article.active && Some(article.id) != except && article.barcode.as_deref() == Some(barcode)
        })
    }

    fn adjust_balance(&mut self, user: u64, delta: i64) {
        if let Some(user) = self.users.get_mut(&user) {
            user.balance += delta;
            user.updated = Some(now());
        }
    }

    fn check_boundary(&self, user: u64, delta: i64) -> Result<(), ApiFailure> {
        let balance = self.users.get(&user).map_or(0, |user| user.balance) + delta;
        if !(ACCOUNT_LOWER..=ACCOUNT_UPPER).contains(&balance) {
            return Err(ApiFailure::new(
                StatusCode::BAD_REQUEST,
                "AccountBalanceBoundaryException",
                format!("Transaction amount '{delta}' leaves account balance boundary"),
            ));
        }
        Ok(())
    }

    fn insert_transaction(&mut self, mut record: TransactionRecord) -> u64 {
        record.id = next_id(&mut self.next_transaction);
        let id = record.id;
        self.transactions.insert(id, record);
        id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/user", get(list_users).post(create_user))
        .route("/user/search", get(search_users))
        .route("/user/{user}", get(get_user).post(update_user))
        .route("/user/{user}/metrics", get(user_metrics))
        .route(
            "/user/{user}/transaction",
            get(list_user_transactions).post(create_transaction),
        )
        .route(
            "/user/{user}/transaction/{id}",
            get(get_transaction).delete(revert_transaction),
        )
        .route("/article", get(list_articles).post(create_article))
        .route("/article/search", get(search_articles))
        .route(
            "/article/{id}",
            get(get_article).post(update_article).delete(deactivate_article),
        )
        .route("/transaction", get(list_transactions))
        .route("/settings", get(settings))
        .route("/metrics", get(system_metrics))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn list_users(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Value> {
    let store = db.read().await;
    let users: Vec<User> = store.users.values().cloned().collect();
    Json(json!({ "users": paginate(&users, &params) }))
}

async fn search_users(State(db): State<Db>, Query(params): Query<ListParams>) -> ApiResult {
    let query = params.query.clone().ok_or_else(|| ApiFailure::parameter_missing("query"))?;
    let store = db.read().await;
    let users: Vec<User> = store
        .users
        .values()
        .filter(|user| user.name.contains(&query))
        .cloned()
        .collect();
    Ok(Json(json!({ "users": paginate(&users, &params) })))
}

async fn create_user(State(db): State<Db>, Json(input): Json<CreateUser>) -> ApiResult {
    let name = input
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiFailure::parameter_missing("name"))?;
    let mut store = db.write().await;
    if store.users.values().any(|user| user.name == name) {
        return Err(ApiFailure::new(
            StatusCode::CONFLICT,
            "UserAlreadyExistsException",
            format!("User '{name}' already exists"),
        ));
    }
    let user = User {
        id: next_id(&mut store.next_user),
        name,
        active: true,
        mail_address: input.mail_address,
        balance: 0,
        created: now(),
        updated: None,
    };
    store.users.insert(user.id, user.clone());
    Ok(Json(json!({ "user": user })))
}

async fn get_user(State(db): State<Db>, Path(key): Path<String>) -> ApiResult {
    let store = db.read().await;
    let user = store.find_user(&key)?;
    Ok(Json(json!({ "user": user })))
}

async fn update_user(State(db): State<Db>, Path(key): Path<String>, Json(input): Json<UpdateUser>) -> ApiResult {
    let mut store = db.write().await;
    let id = store.user_id(&key)?;
    if let Some(name) = &input.name {
        if store.users.values().any(|user| user.id != id && &user.name == name) {
            return Err(ApiFailure::new(
                StatusCode::CONFLICT,
                "UserAlreadyExistsException",
                format!("User '{name}' already exists"),
            ));
        }
    }
    let user = store.users.get_mut(&id).ok_or_else(|| ApiFailure::user_not_found(&key))?;
    if let Some(name) = input.name {
        user.name = name;
    }
    if input.mail_address.is_some() {
        user.mail_address = input.mail_address;
    }
    if let Some(active) = input.active {
        user.active = active;
    }
    user.updated = Some(now());
    Ok(Json(json!({ "user": user.clone() })))
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

async fn list_articles(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Value> {
    let store = db.read().await;
    let articles: Vec<Article> = store
        .articles
        .keys()
        .filter_map(|id| store.render_article(*id))
        .collect();
    Json(json!({ "articles": paginate(&articles, &params) }))
}

async fn search_articles(State(db): State<Db>, Query(params): Query<ListParams>) -> ApiResult {
    if params.query.is_none() && params.barcode.is_none() {
        return Err(ApiFailure::parameter_missing("query"));
    }
    let store = db.read().await;
    let articles: Vec<Article> = store
        .articles
        .values()
        .filter(|article| article.active)
        .filter(|article| params.query.as_ref().map_or(true, |query| article.name.contains(query.as_str())))
        .filter(|article| {
            params
                .barcode
                .as_ref()
                .map_or(true, |barcode| article.barcode.as_ref().is_some_and(|own| own.contains(barcode.as_str())))
        })
        .filter_map(|article| store.render_article(article.id))
        .collect();
    Ok(Json(json!({ "articles": paginate(&articles, &params) })))
}

fn validate_article(input: &CreateArticle) -> Result<(String, i64), ApiFailure> {
    let name = input
        .name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiFailure::parameter_missing("name"))?;
    let amount = input.amount.ok_or_else(|| ApiFailure::parameter_missing("amount"))?;
    Ok((name, amount))
}

fn barcode_conflict(barcode: &str) -> ApiFailure {
    ApiFailure::new(
        StatusCode::CONFLICT,
        "ArticleBarcodeAlreadyExistsException",
        format!("Article with barcode '{barcode}' already exists"),
    )
}

async fn create_article(State(db): State<Db>, Json(input): Json<CreateArticle>) -> ApiResult {
    let (name, amount) = validate_article(&input)?;
    let mut store = db.write().await;
    if let Some(barcode) = &input.barcode {
        if store.barcode_taken(barcode, None) {
            return Err(barcode_conflict(barcode));
        }
    }
    let id = next_id(&mut store.next_article);
    store.articles.insert(
        id,
        ArticleRecord {
            id,
            name,
            amount,
            barcode: input.barcode,
            active: true,
            precursor: None,
            created: now(),
            usage_count: 0,
        },
    );
    Ok(Json(json!({ "article": store.render_article(id) })))
}

async fn get_article(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult {
    let store = db.read().await;
    let article = store.render_article(id).ok_or_else(|| ApiFailure::article_not_found(id))?;
    Ok(Json(json!({ "article": article })))
}

/// Articles that were already sold are replaced rather than changed, so old
/// transactions keep pointing at the price they were booked with.
async fn update_article(State(db): State<Db>, Path(id): Path<u64>, Json(input): Json<CreateArticle>) -> ApiResult {
    let (name, amount) = validate_article(&input)?;
    let mut store = db.write().await;
    let existing = store
        .articles
        .get(&id)
        .cloned()
        .ok_or_else(|| ApiFailure::article_not_found(id))?;
    if let Some(barcode) = &input.barcode {
        if store.barcode_taken(barcode, Some(id)) {
            return Err(barcode_conflict(barcode));
        }
    }

    let target = if existing.usage_count > 0 {
        let new_id = next_id(&mut store.next_article);
        if let Some(old) = store.articles.get_mut(&id) {
            old.active = false;
        }
        store.articles.insert(
            new_id,
            ArticleRecord {
                id: new_id,
                name,
                amount,
                barcode: input.barcode,
                active: true,
                precursor: Some(id),
                created: now(),
                usage_count: 0,
            },
        );
        new_id
    } else {
        if let Some(article) = store.articles.get_mut(&id) {
            article.name = name;
            article.amount = amount;
            article.barcode = input.barcode;
        }
        id
    };
    Ok(Json(json!({ "article": store.render_article(target) })))
}

async fn deactivate_article(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult {
    let mut store = db.write().await;
    let article = store
        .articles
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::article_not_found(id))?;
    article.active = false;
    Ok(Json(json!({ "article": store.render_article(id) })))
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

async fn list_transactions(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Value> {
    let store = db.read().await;
    let all = store.render_transactions(store.transactions.values().rev());
    Json(json!({ "transactions": paginate(&all, &params) }))
}

async fn list_user_transactions(
    State(db): State<Db>,
    Path(key): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult {
    let store = db.read().await;
    let user = store.user_id(&key)?;
    let own = store.render_transactions(store.transactions.values().rev().filter(|tx| tx.user == user));
    Ok(Json(json!({ "transactions": paginate(&own, &params) })))
}

async fn create_transaction(
    State(db): State<Db>,
    Path(key): Path<String>,
    Json(input): Json<CreateTransaction>,
) -> ApiResult {
    let mut store = db.write().await;
    let user = store.user_id(&key)?;

    let mut amount = input.amount;
    let mut quantity = None;
    if let Some(article_id) = input.article_id {
        let article = store
            .articles
            .get(&article_id)
            .ok_or_else(|| ApiFailure::article_not_found(article_id))?;
        if !article.active {
            return Err(ApiFailure::new(
                StatusCode::BAD_REQUEST,
                "ArticleInactiveException",
                format!("Article '{article_id}' is inactive"),
            ));
        }
        let count = input.quantity.unwrap_or(1);
        if count == 0 {
            return Err(ApiFailure::parameter_invalid("quantity"));
        }
        quantity = Some(count);
        amount = amount.or(Some(-article.amount * i64::from(count)));
    }
    let amount = amount.ok_or_else(|| ApiFailure::parameter_missing("amount"))?;

    if !(PAYMENT_LOWER..=PAYMENT_UPPER).contains(&amount) {
        return Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            "TransactionBoundaryException",
            format!("Amount '{amount}' exceeds the transaction boundary"),
        ));
    }

    let recipient = match input.recipient {
        Some(recipient) => {
            let recipient = store.user_id(&recipient.to_string())?;
            if recipient == user || amount >= 0 || input.article_id.is_some() {
                return Err(ApiFailure::parameter_invalid("recipient"));
            }
            store.check_boundary(recipient, -amount)?;
            Some(recipient)
        }
        None => None,
    };
    store.check_boundary(user, amount)?;

    let created = now();
    let id = store.insert_transaction(TransactionRecord {
        id: 0,
        user,
        article: input.article_id,
        sender: None,
        recipient,
        quantity,
        comment: input.comment.clone(),
        amount,
        deleted: false,
        created: created.clone(),
        mirror: None,
    });
    store.adjust_balance(user, amount);

    if let Some(recipient) = recipient {
        let mirror = store.insert_transaction(TransactionRecord {
            id: 0,
            user: recipient,
            article: None,
            sender: Some(user),
            recipient: None,
            quantity: None,
            comment: input.comment,
            amount: -amount,
            deleted: false,
            created,
            mirror: Some(id),
        });
        store.adjust_balance(recipient, -amount);
        if let Some(tx) = store.transactions.get_mut(&id) {
            tx.mirror = Some(mirror);
        }
    }
    if let (Some(article), Some(count)) = (input.article_id, quantity) {
        if let Some(article) = store.articles.get_mut(&article) {
            article.usage_count += u64::from(count);
        }
    }

    let tx = store
        .transactions
        .get(&id)
        .and_then(|record| store.render_transaction(record));
    Ok(Json(json!({ "transaction": tx })))
}

fn owned_transaction(store: &Store, user: u64, id: u64) -> Result<TransactionRecord, ApiFailure> {
    store
        .transactions
        .get(&id)
        .filter(|tx| tx.user == user)
        .cloned()
        .ok_or_else(|| ApiFailure::transaction_not_found(id))
}

async fn get_transaction(State(db): State<Db>, Path((key, id)): Path<(String, u64)>) -> ApiResult {
    let store = db.read().await;
    let user = store.user_id(&key)?;
    let record = owned_transaction(&store, user, id)?;
    Ok(Json(json!({ "transaction": store.render_transaction(&record) })))
}

async fn revert_transaction(State(db): State<Db>, Path((key, id)): Path<(String, u64)>) -> ApiResult {
    let mut store = db.write().await;
    let user = store.user_id(&key)?;
    let record = owned_transaction(&store, user, id)?;
    if record.deleted {
        return Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            "TransactionNotDeletableException",
            format!("Transaction '{id}' is not deletable"),
        ));
    }

    for tx_id in std::iter::once(id).chain(record.mirror) {
        let Some(tx) = store.transactions.get_mut(&tx_id) else {
            continue;
        };
        tx.deleted = true;
        let (owner, amount) = (tx.user, tx.amount);
        store.adjust_balance(owner, -amount);
    }
    if let (Some(article), Some(count)) = (record.article, record.quantity) {
        if let Some(article) = store.articles.get_mut(&article) {
            article.usage_count = article.usage_count.saturating_sub(u64::from(count));
        }
    }

    let tx = store
        .transactions
        .get(&id)
        .and_then(|record| store.render_transaction(record));
    Ok(Json(json!({ "transaction": tx })))
}

// ---------------------------------------------------------------------------
// Settings & metrics
// ---------------------------------------------------------------------------

async fn settings() -> Json<Value> {
    Json(json!({
        "settings": {
            "common": {"idleTimeout": 30000},
            "paypal": {"enabled": false, "recipient": "", "fee": 0},
            "user": {"stalePeriod": "10 day"},
            "i18n": {
                "dateFormat": "YYYY-MM-DD HH:mm:ss",
                "timezone": "auto",
                "language": "en",
                "currency": {"name": "Euro", "symbol": "€", "alpha3": "EUR"}
            },
            "account": {"boundary": {"upper": ACCOUNT_UPPER, "lower": ACCOUNT_LOWER}},
            "payment": {
                "undo": {"enabled": true, "delete": false, "timeout": "5 minute"},
                "boundary": {"upper": PAYMENT_UPPER, "lower": PAYMENT_LOWER},
                "transactions": {"enabled": true},
                "dispense": {"enabled": true, "custom": true, "steps": [50, 100, 200, 500, 1000]},
                "deposit": {"enabled": true, "custom": true, "steps": [50, 100, 200, 500, 1000]}
            }
        }
    }))
}

fn created_on(record: &TransactionRecord) -> Option<NaiveDate> {
    record.created.get(..10).and_then(|day| day.parse().ok())
}

async fn system_metrics(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    let live: Vec<&TransactionRecord> = store.transactions.values().filter(|tx| !tx.deleted).collect();
    let today = Utc::now().date_naive();

    // counts are strings on the real server too
    let days: Vec<Value> = (0..30)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .map(|day| {
            let on_day: Vec<&&TransactionRecord> = live.iter().filter(|tx| created_on(tx) == Some(day)).collect();
            let mut users: Vec<u64> = on_day.iter().map(|tx| tx.user).collect();
            users.sort_unstable();
            users.dedup();
            let positive: i64 = on_day.iter().map(|tx| tx.amount).filter(|a| *a > 0).sum();
            let negative: i64 = on_day.iter().map(|tx| tx.amount).filter(|a| *a < 0).sum();
            json!({
                "date": day.format("%Y-%m-%d").to_string(),
                "count": on_day.len().to_string(),
                "distinctUsers": users.len().to_string(),
                "balance": positive + negative,
                "positiveBalance": positive,
                "negativeBalance": negative,
            })
        })
        .collect();

    Json(json!({
        "balance": store.users.values().map(|user| user.balance).sum::<i64>(),
        "transactionCount": live.len(),
        "userCount": store.users.len(),
        "days": days,
    }))
}

async fn user_metrics(State(db): State<Db>, Path(key): Path<String>) -> ApiResult {
    let store = db.read().await;
    let user = store.find_user(&key)?;
    let own: Vec<&TransactionRecord> = store
        .transactions
        .values()
        .filter(|tx| tx.user == user.id && !tx.deleted)
        .collect();

    let mut per_article: BTreeMap<u64, (u64, i64)> = BTreeMap::new();
    for tx in &own {
        if let (Some(article), Some(quantity)) = (tx.article, tx.quantity) {
            let entry = per_article.entry(article).or_default();
            entry.0 += u64::from(quantity);
            entry.1 += -tx.amount;
        }
    }
    let articles: Vec<Value> = per_article
        .into_iter()
        .filter_map(|(id, (count, amount))| {
            store
                .render_article(id)
                .map(|article| json!({"article": article, "count": count, "amount": amount}))
        })
        .collect();

    let outgoing: Vec<i64> = own.iter().map(|tx| tx.amount).filter(|a| *a < 0).collect();
    let incoming: Vec<i64> = own.iter().map(|tx| tx.amount).filter(|a| *a > 0).collect();

    Ok(Json(json!({
        "balance": user.balance,
        "articles": articles,
        "transactions": {
            "count": own.len(),
            "outgoing": {"count": outgoing.len(), "amount": outgoing.iter().sum::<i64>()},
            "incoming": {"count": incoming.len(), "amount": incoming.iter().sum::<i64>()},
        }
    })))
}
