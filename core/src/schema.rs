//! Wire DTOs for the strichliste v2 API.
//!
//! # Design
//! Entities are read-only snapshots decoded from server responses. Writes go
//! through dedicated `*Request` payload types; an entity is never sent back.
//! Single-item and collection responses arrive wrapped in an envelope keyed by
//! the entity name (`{"article": ..}` / `{"articles": [..]}`); the envelope
//! structs here only exist to be unwrapped by the operation wrappers.
//!
//! Unknown fields are ignored. In particular the article `usageCount` is not
//! modelled: its meaning across reversals and precursor chains is unclear.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::types::{Currency, Id, Timestamp};

pub const ENDPOINT_ARTICLE: &str = "/article";
pub const ENDPOINT_ARTICLE_SEARCH: &str = "/article/search";
pub const ENDPOINT_USER: &str = "/user";
pub const ENDPOINT_USER_SEARCH: &str = "/user/search";
pub const ENDPOINT_TRANSACTION: &str = "/transaction";
pub const ENDPOINT_SETTINGS: &str = "/settings";
pub const ENDPOINT_METRICS: &str = "/metrics";

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub name: String,
    #[serde(rename = "active")]
    pub is_active: bool,
    #[serde(rename = "mailAddress", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub balance: Currency,
    #[serde(default)]
    pub created: Timestamp,
    #[serde(default)]
    pub updated: Timestamp,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserCreateRequest {
    pub name: String,
    #[serde(rename = "mailAddress", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Only the fields that are set are changed on the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "mailAddress", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SingleUserResponse {
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct MultiUserResponse {
    #[serde(default)]
    pub users: Vec<User>,
}

// ---------------------------------------------------------------------------
// Article
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: Id,
    pub name: String,
    #[serde(rename = "amount")]
    pub price: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(rename = "active")]
    pub is_active: bool,
    /// The deactivated article this one replaced on update, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precursor: Option<Box<Article>>,
    #[serde(default)]
    pub created: Timestamp,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleCreateRequest {
    pub name: String,
    pub amount: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
}

/// The server may answer an update with a new article that references the
/// old one as `precursor` instead of changing it in place.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleUpdateRequest {
    pub name: String,
    pub amount: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SingleArticleResponse {
    pub article: Article,
}

#[derive(Debug, Deserialize)]
pub struct MultiArticleResponse {
    #[serde(default)]
    pub articles: Vec<Article>,
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// What a transaction did, recovered from which optional wire fields are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    /// Plain deposit (positive amount) or withdrawal (negative amount).
    Plain,
    /// Money moved between two users. The server fills in the counterpart
    /// from the issuer's point of view, so at least one side is present.
    Transfer {
        sender: Option<Box<User>>,
        recipient: Option<Box<User>>,
    },
    Purchase { article: Box<Article>, quantity: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTransaction", into = "RawTransaction")]
pub struct Transaction {
    pub id: Id,
    pub issuer: User,
    /// Signed; negative means money left the issuer's account.
    pub amount: Currency,
    pub comment: Option<String>,
    pub created: Timestamp,
    pub is_reversed: bool,
    pub is_reversible: bool,
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn article(&self) -> Option<&Article> {
        match &self.kind {
            TransactionKind::Purchase { article, .. } => Some(article.as_ref()),
            _ => None,
        }
    }

    pub fn quantity(&self) -> Option<u32> {
        match self.kind {
            TransactionKind::Purchase { quantity, .. } => Some(quantity),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawTransaction {
    id: Id,
    #[serde(rename = "user")]
    issuer: User,
    amount: Currency,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    created: Timestamp,
    #[serde(rename = "deleted", default)]
    is_reversed: bool,
    #[serde(rename = "isDeletable", default)]
    is_reversible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sender: Option<Box<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recipient: Option<Box<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    article: Option<Box<Article>>,
    /// Some server versions embed the purchased article under this key.
    #[serde(rename = "articleId", default, skip_serializing)]
    legacy_article: Option<serde_json::Value>,
}

/// A transaction body whose purchase fields do not fit together.
#[derive(Debug, Error)]
pub enum TransactionShapeError {
    #[error("articleId is not an article object: {0}")]
    LegacyArticle(#[source] serde_json::Error),

    #[error("quantity {0} without an article")]
    QuantityWithoutArticle(u32),
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = TransactionShapeError;

    /// `articleId` is only consulted when `article` is absent. A purchase
    /// without `quantity` counts one item.
    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        let article = match (raw.article, raw.legacy_article) {
            (Some(article), _) => Some(article),
            (None, Some(value)) => Some(Box::new(
                serde_json::from_value::<Article>(value).map_err(TransactionShapeError::LegacyArticle)?,
            )),
            (None, None) => None,
        };
        let kind = match (article, raw.sender, raw.recipient) {
            (Some(article), _, _) => TransactionKind::Purchase {
                article,
                quantity: raw.quantity.unwrap_or(1),
            },
            (None, sender, recipient) => {
                if let Some(quantity) = raw.quantity {
                    return Err(TransactionShapeError::QuantityWithoutArticle(quantity));
                }
                match (sender, recipient) {
                    (None, None) => TransactionKind::Plain,
                    (sender, recipient) => TransactionKind::Transfer { sender, recipient },
                }
            }
        };
        Ok(Transaction {
            id: raw.id,
            issuer: raw.issuer,
            amount: raw.amount,
            comment: raw.comment,
            created: raw.created,
            is_reversed: raw.is_reversed,
            is_reversible: raw.is_reversible,
            kind,
        })
    }
}

impl From<Transaction> for RawTransaction {
    fn from(tx: Transaction) -> Self {
        let (sender, recipient, article, quantity) = match tx.kind {
            TransactionKind::Plain => (None, None, None, None),
            TransactionKind::Transfer { sender, recipient } => (sender, recipient, None, None),
            TransactionKind::Purchase { article, quantity } => {
                (None, None, Some(article), Some(quantity))
            }
        };
        RawTransaction {
            id: tx.id,
            issuer: tx.issuer,
            amount: tx.amount,
            comment: tx.comment,
            created: tx.created,
            is_reversed: tx.is_reversed,
            is_reversible: tx.is_reversible,
            sender,
            recipient,
            quantity,
            article,
            legacy_article: None,
        }
    }
}

/// Payload for `POST /user/{id}/transaction`.
///
/// With `article_id` set the server books a purchase; `amount` still wins
/// over the article's price. With `recipient` set it books a transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionCreateRequest {
    pub amount: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Id>,
    #[serde(rename = "articleId", skip_serializing_if = "Option::is_none")]
    pub article_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SingleTransactionResponse {
    pub transaction: Transaction,
}

#[derive(Debug, Deserialize)]
pub struct MultiTransactionResponse {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    #[serde(default)]
    pub lower: Currency,
    #[serde(default)]
    pub upper: Currency,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountPreset {
    #[serde(rename = "enabled", default)]
    pub is_enabled: bool,
    #[serde(rename = "custom", default)]
    pub allow_custom_amount: bool,
    #[serde(rename = "steps", default)]
    pub preset_amounts: Vec<Currency>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonSettings {
    #[serde(rename = "idleTimeout")]
    pub idle_timeout: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaypalSettings {
    #[serde(rename = "enabled")]
    pub is_enabled: bool,
    pub recipient: String,
    #[serde(rename = "fee")]
    pub percent_fee: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    #[serde(rename = "stalePeriod")]
    pub stale_period: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyInfo {
    pub name: String,
    pub symbol: String,
    pub alpha3: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nSettings {
    #[serde(rename = "dateFormat")]
    pub date_format: String,
    pub timezone: String,
    pub language: String,
    pub currency: CurrencyInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
    #[serde(rename = "boundary")]
    pub limit: Limit,
}

/// Whether and for how long transactions may be reverted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReversalPolicy {
    #[serde(rename = "enabled")]
    pub is_enabled: bool,
    #[serde(rename = "delete")]
    pub deletes: bool,
    pub timeout: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferPolicy {
    #[serde(rename = "enabled")]
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentSettings {
    #[serde(rename = "undo")]
    pub reverse: ReversalPolicy,
    #[serde(rename = "boundary")]
    pub limit: Limit,
    #[serde(rename = "transactions")]
    pub transfer_funds: TransferPolicy,
    pub deposit: AmountPreset,
    #[serde(rename = "dispense")]
    pub withdraw: AmountPreset,
}

/// Server-wide configuration. Read-only for clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub common: CommonSettings,
    pub paypal: PaypalSettings,
    pub user: UserSettings,
    pub i18n: I18nSettings,
    pub account: AccountSettings,
    pub payment: PaymentSettings,
}

#[derive(Debug, Deserialize)]
pub struct SettingsResponse {
    pub settings: Settings,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// The server reports some aggregate counts as JSON strings (raw SQL
/// results) and others as numbers.
fn count_from_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Aggregates for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMetric {
    pub date: NaiveDate,
    #[serde(rename = "count", default, deserialize_with = "count_from_string_or_number")]
    pub transaction_count: u64,
    #[serde(rename = "distinctUsers", default, deserialize_with = "count_from_string_or_number")]
    pub distinct_users: u64,
    #[serde(rename = "balance", default)]
    pub system_balance: Currency,
    #[serde(rename = "positiveBalance", default)]
    pub positive_flux: Currency,
    #[serde(rename = "negativeBalance", default)]
    pub negative_flux: Currency,
}

/// `GET /metrics`; `days` covers the last 30 days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemMetrics {
    #[serde(rename = "balance")]
    pub system_balance: Currency,
    #[serde(rename = "transactionCount")]
    pub transaction_count: u64,
    #[serde(rename = "userCount")]
    pub user_count: u64,
    pub days: Vec<DayMetric>,
}

/// Spend on a single article by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMetric {
    pub article: Article,
    #[serde(default, deserialize_with = "count_from_string_or_number")]
    pub count: u64,
    #[serde(default)]
    pub amount: Currency,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluxMetric {
    #[serde(deserialize_with = "count_from_string_or_number")]
    pub count: u64,
    pub amount: Currency,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionMetrics {
    #[serde(deserialize_with = "count_from_string_or_number")]
    pub count: u64,
    pub outgoing: FluxMetric,
    pub incoming: FluxMetric,
}

/// `GET /user/{id}/metrics`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserMetrics {
    pub balance: Currency,
    pub articles: Vec<ArticleMetric>,
    pub transactions: TransactionMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_json(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("user{id}"),
            "active": true,
            "mailAddress": null,
            "balance": 1500,
            "created": "2020-01-02 03:04:05",
            "updated": null
        })
    }

    fn article_json() -> serde_json::Value {
        json!({
            "id": 7,
            "name": "Club Mate",
            "amount": 250,
            "barcode": "4029764001807",
            "active": true,
            "precursor": {
                "id": 3,
                "name": "Club Mate",
                "amount": 200,
                "barcode": null,
                "active": false,
                "precursor": null,
                "created": "2019-05-01 12:00:00",
                "usageCount": 12
            },
            "created": "2020-01-02 03:04:05",
            "usageCount": 4
        })
    }

    #[test]
    fn article_decodes_precursor_and_ignores_usage_count() {
        let article: Article = serde_json::from_value(article_json()).unwrap();
        assert_eq!(article.id, Id::new(7));
        assert_eq!(article.price, Currency::from_cents(250));
        let precursor = article.precursor.as_deref().unwrap();
        assert_eq!(precursor.id, Id::new(3));
        assert!(!precursor.is_active);
        assert!(precursor.barcode.is_none());

        let encoded = serde_json::to_value(&article).unwrap();
        assert!(encoded.get("usageCount").is_none());
        assert_eq!(encoded["precursor"]["amount"], 200);
    }

    #[test]
    fn transaction_without_optional_fields_is_plain() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": 1,
            "user": user_json(42),
            "amount": 1000,
            "comment": null,
            "created": "2020-01-02 03:04:05",
            "deleted": false,
            "isDeletable": true,
            "sender": null,
            "recipient": null,
            "article": null,
            "quantity": null
        }))
        .unwrap();
        assert_eq!(tx.kind, TransactionKind::Plain);
        assert!(tx.is_reversible);
        assert_eq!(tx.article(), None);
        assert_eq!(tx.quantity(), None);
    }

    #[test]
    fn transaction_with_recipient_is_transfer() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": 2,
            "user": user_json(42),
            "amount": -300,
            "comment": "rent",
            "created": "2020-01-02 03:04:05",
            "deleted": false,
            "isDeletable": false,
            "recipient": user_json(43)
        }))
        .unwrap();
        match &tx.kind {
            TransactionKind::Transfer { sender, recipient } => {
                assert!(sender.is_none());
                assert_eq!(recipient.as_ref().unwrap().id, Id::new(43));
            }
            other => panic!("expected transfer, got {other:?}"),
        }
    }

    #[test]
    fn transaction_with_article_is_purchase() {
        for key in ["article", "articleId"] {
            let mut body = json!({
                "id": 3,
                "user": user_json(42),
                "amount": -500,
                "created": "2020-01-02 03:04:05",
                "deleted": false,
                "isDeletable": true,
                "quantity": 2
            });
            body[key] = article_json();
            let tx: Transaction = serde_json::from_value(body).unwrap();
            assert_eq!(tx.quantity(), Some(2), "key {key}");
            assert_eq!(tx.article().unwrap().id, Id::new(7), "key {key}");
        }
    }

    #[test]
    fn legacy_article_id_must_be_an_article() {
        let body = json!({
            "id": 3,
            "user": user_json(42),
            "amount": -500,
            "created": "2020-01-02 03:04:05",
            "quantity": 2,
            "articleId": 7
        });
        let err = serde_json::from_value::<Transaction>(body).unwrap_err();
        assert!(err.to_string().contains("articleId is not an article"), "{err}");
    }

    #[test]
    fn quantity_without_article_is_rejected() {
        for extra in [json!({}), json!({"recipient": user_json(43)})] {
            let mut body = json!({
                "id": 3,
                "user": user_json(42),
                "amount": -500,
                "created": "2020-01-02 03:04:05",
                "quantity": 2
            });
            for (key, value) in extra.as_object().unwrap() {
                body[key] = value.clone();
            }
            let err = serde_json::from_value::<Transaction>(body).unwrap_err();
            assert!(err.to_string().contains("quantity 2 without an article"), "{err}");
        }
    }

    #[test]
    fn null_purchase_fields_stay_plain() {
        let body = json!({
            "id": 3,
            "user": user_json(42),
            "amount": 100,
            "created": "2020-01-02 03:04:05",
            "quantity": null,
            "article": null,
            "articleId": null
        });
        let tx: Transaction = serde_json::from_value(body).unwrap();
        assert_eq!(tx.kind, TransactionKind::Plain);
    }

    #[test]
    fn purchase_without_quantity_counts_one() {
        let body = json!({
            "id": 3,
            "user": user_json(42),
            "amount": -250,
            "created": "2020-01-02 03:04:05",
            "article": article_json()
        });
        let tx: Transaction = serde_json::from_value(body).unwrap();
        assert_eq!(tx.quantity(), Some(1));
        assert_eq!(serde_json::to_value(&tx).unwrap()["quantity"], 1);
    }

    #[test]
    fn transaction_reencodes_populated_fields() {
        let body = json!({
            "id": 3,
            "user": user_json(42),
            "amount": -500,
            "comment": "snacks",
            "created": "2020-01-02 03:04:05",
            "deleted": false,
            "isDeletable": true,
            "quantity": 2,
            "article": article_json()
        });
        let tx: Transaction = serde_json::from_value(body).unwrap();
        let encoded = serde_json::to_value(&tx).unwrap();
        assert_eq!(encoded["amount"], -500);
        assert_eq!(encoded["comment"], "snacks");
        assert_eq!(encoded["quantity"], 2);
        assert_eq!(encoded["article"]["id"], 7);
        assert_eq!(encoded["user"]["id"], 42);
        assert_eq!(encoded["created"], "2020-01-02 03:04:05");
        assert!(encoded.get("recipient").is_none());

        let again: Transaction = serde_json::from_value(encoded).unwrap();
        assert_eq!(again, tx);
    }

    #[test]
    fn transaction_request_omits_unset_fields() {
        let request = TransactionCreateRequest {
            amount: Currency::from_cents(-500),
            article_id: Some(Id::new(7)),
            quantity: Some(2),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"amount": -500, "articleId": 7, "quantity": 2})
        );
    }

    #[test]
    fn user_update_request_sends_only_set_fields() {
        let request = UserUpdateRequest {
            active: Some(false),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"active": false}));
    }

    #[test]
    fn settings_decode_nested_sections() {
        let settings: SettingsResponse = serde_json::from_value(json!({
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
                "account": {"boundary": {"upper": 20000, "lower": -20000}},
                "payment": {
                    "undo": {"enabled": true, "delete": false, "timeout": "5 minute"},
                    "boundary": {"upper": 15000, "lower": -2000},
                    "transactions": {"enabled": true},
                    "dispense": {"enabled": true, "custom": true, "steps": [50, 100, 200]},
                    "deposit": {"enabled": true, "custom": true, "steps": [50, 100]}
                }
            }
        }))
        .unwrap();
        let settings = settings.settings;
        assert_eq!(settings.common.idle_timeout, 30000);
        assert_eq!(settings.i18n.currency.alpha3, "EUR");
        assert_eq!(settings.account.limit.lower, Currency::from_cents(-20000));
        assert!(settings.payment.reverse.is_enabled);
        assert_eq!(settings.payment.reverse.timeout, "5 minute");
        assert_eq!(settings.payment.withdraw.preset_amounts.len(), 3);
        assert!(settings.payment.transfer_funds.is_enabled);
    }

    #[test]
    fn day_metrics_accept_string_counts() {
        let metrics: SystemMetrics = serde_json::from_value(json!({
            "balance": 12345,
            "transactionCount": 99,
            "userCount": 7,
            "days": [
                {"date": "2020-01-02", "count": "4", "distinctUsers": "2",
                 "balance": 100, "positiveBalance": 300, "negativeBalance": -200},
                {"date": "2020-01-03", "count": 0, "distinctUsers": 0,
                 "balance": 0, "positiveBalance": 0, "negativeBalance": 0}
            ]
        }))
        .unwrap();
        assert_eq!(metrics.user_count, 7);
        assert_eq!(metrics.days[0].transaction_count, 4);
        assert_eq!(metrics.days[0].distinct_users, 2);
        assert_eq!(metrics.days[0].date, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(metrics.days[1].transaction_count, 0);
    }
}
