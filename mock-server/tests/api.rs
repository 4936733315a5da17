use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Article, Transaction, User};
use serde::Deserialize;
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Deserialize)]
struct ArticleEnvelope {
    article: Article,
}

#[derive(Deserialize)]
struct TransactionEnvelope {
    transaction: Transaction,
}

fn error_class(body: &Value) -> &str {
    body["error"]["class"].as_str().unwrap()
}

/// Sends one request to a shared router.
async fn call(app: &axum::Router, request: Request<String>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

// --- users ---

#[tokio::test]
async fn list_users_empty() {
    let resp = app().oneshot(get("/user")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, serde_json::json!({"users": []}));
}

#[tokio::test]
async fn create_user_wraps_in_envelope() {
    let resp = app()
        .oneshot(json_request("POST", "/user", r#"{"name":"alice","mailAddress":"a@example.org"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: UserEnvelope = body_json(resp).await;
    assert_eq!(body.user.id, 1);
    assert_eq!(body.user.name, "alice");
    assert_eq!(body.user.balance, 0);
    assert!(body.user.active);
    assert!(body.user.updated.is_none());
}

#[tokio::test]
async fn duplicate_user_is_conflict() {
    let app = app();
    call(&app, json_request("POST", "/user", r#"{"name":"alice"}"#)).await;
    let resp = call(&app, json_request("POST", "/user", r#"{"name":"alice"}"#)).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = body_json(resp).await;
    assert_eq!(error_class(&body), "App\\Exception\\UserAlreadyExistsException");
}

#[tokio::test]
async fn missing_user_has_error_envelope() {
    let resp = app().oneshot(get("/user/1337")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers().get(http::header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body: Value = body_json(resp).await;
    assert_eq!(error_class(&body), "App\\Exception\\UserNotFoundException");
    assert_eq!(body["error"]["code"], 404);
    assert_eq!(body["error"]["message"], "User '1337' not found");
}

#[tokio::test]
async fn user_lookup_by_name_and_search() {
    let app = app();
    call(&app, json_request("POST", "/user", r#"{"name":"alice"}"#)).await;
    call(&app, json_request("POST", "/user", r#"{"name":"bob"}"#)).await;

    let resp = call(&app, get("/user/bob")).await;
    let body: UserEnvelope = body_json(resp).await;
    assert_eq!(body.user.id, 2);

    let resp = call(&app, get("/user/search?query=ali")).await;
    let body: Value = body_json(resp).await;
    assert_eq!(body["users"].as_array().unwrap().len(), 1);
    assert_eq!(body["users"][0]["name"], "alice");
}

#[tokio::test]
async fn update_user_deactivates() {
    let app = app();
    call(&app, json_request("POST", "/user", r#"{"name":"alice"}"#)).await;
    let resp = call(&app, json_request("POST", "/user/1", r#"{"active":false}"#)).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: UserEnvelope = body_json(resp).await;
    assert!(!body.user.active);
    assert!(body.user.updated.is_some());
}

#[tokio::test]
async fn pagination_skips_pages() {
    let app = app();
    for name in ["a", "b", "c", "d", "e"] {
        call(&app, json_request("POST", "/user", &format!(r#"{{"name":"{name}"}}"#))).await;
    }
    let resp = call(&app, get("/user?page=2&limit=2")).await;
    let body: Value = body_json(resp).await;
    let names: Vec<&str> = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["c", "d"]);
}

#[tokio::test]
async fn huge_page_is_empty_not_a_crash() {
    let app = app();
    call(&app, json_request("POST", "/user", r#"{"name":"alice"}"#)).await;
    let uri = format!("/user?page={}&limit={}", usize::MAX, usize::MAX);
    let resp = call(&app, get(&uri)).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, serde_json::json!({"users": []}));
}

// --- articles ---

#[tokio::test]
async fn duplicate_barcode_is_rejected() {
    let app = app();
    call(&app, json_request("POST", "/article", r#"{"name":"Mate","amount":150,"barcode":"123"}"#)).await;
    let resp = call(&app, json_request("POST", "/article", r#"{"name":"Tschunk","amount":400,"barcode":"123"}"#)).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = body_json(resp).await;
    assert_eq!(error_class(&body), "App\\Exception\\ArticleBarcodeAlreadyExistsException");
}

#[tokio::test]
async fn article_without_amount_is_parameter_missing() {
    let resp = app()
        .oneshot(json_request("POST", "/article", r#"{"name":"Mate"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(error_class(&body), "App\\Exception\\ParameterMissingException");
}

#[tokio::test]
async fn unused_article_updates_in_place() {
    let app = app();
    call(&app, json_request("POST", "/article", r#"{"name":"Mate","amount":150}"#)).await;
    let resp = call(&app, json_request("POST", "/article/1", r#"{"name":"Mate","amount":200}"#)).await;

    let body: ArticleEnvelope = body_json(resp).await;
    assert_eq!(body.article.id, 1);
    assert_eq!(body.article.amount, 200);
    assert!(body.article.precursor.is_none());
}

#[tokio::test]
async fn used_article_is_replaced_with_precursor() {
    let app = app();
    call(&app, json_request("POST", "/user", r#"{"name":"alice"}"#)).await;
    call(&app, json_request("POST", "/article", r#"{"name":"Mate","amount":150}"#)).await;
    call(&app, json_request("POST", "/user/1/transaction", r#"{"articleId":1}"#)).await;

    let resp = call(&app, json_request("POST", "/article/1", r#"{"name":"Mate","amount":200}"#)).await;
    let body: ArticleEnvelope = body_json(resp).await;
    assert_eq!(body.article.id, 2);
    let precursor = body.article.precursor.unwrap();
    assert_eq!(precursor.id, 1);
    assert!(!precursor.active);
}

#[tokio::test]
async fn deactivated_article_cannot_be_bought() {
    let app = app();
    call(&app, json_request("POST", "/user", r#"{"name":"alice"}"#)).await;
    call(&app, json_request("POST", "/article", r#"{"name":"Mate","amount":150}"#)).await;
    let resp = call(&app, json_request("DELETE", "/article/1", "")).await;
    let body: ArticleEnvelope = body_json(resp).await;
    assert!(!body.article.active);

    let resp = call(&app, json_request("POST", "/user/1/transaction", r#"{"articleId":1}"#)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(error_class(&body), "App\\Exception\\ArticleInactiveException");
}

#[tokio::test]
async fn search_articles_by_barcode() {
    let app = app();
    call(&app, json_request("POST", "/article", r#"{"name":"Mate","amount":150,"barcode":"4029764001807"}"#)).await;
    call(&app, json_request("POST", "/article", r#"{"name":"Tschunk","amount":400}"#)).await;

    let resp = call(&app, get("/article/search?barcode=4029764001807")).await;
    let body: Value = body_json(resp).await;
    assert_eq!(body["articles"].as_array().unwrap().len(), 1);
    assert_eq!(body["articles"][0]["name"], "Mate");
}

// --- transactions ---

#[tokio::test]
async fn purchase_charges_price_times_quantity() {
    let app = app();
    call(&app, json_request("POST", "/user", r#"{"name":"alice"}"#)).await;
    call(&app, json_request("POST", "/article", r#"{"name":"Mate","amount":250}"#)).await;

    let resp = call(&app, json_request("POST", "/user/1/transaction", r#"{"articleId":1,"quantity":2}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: TransactionEnvelope = body_json(resp).await;
    assert_eq!(body.transaction.amount, -500);
    assert_eq!(body.transaction.quantity, Some(2));
    assert_eq!(body.transaction.user.balance, -500);
    assert_eq!(body.transaction.article.unwrap().usage_count, 2);
}

#[tokio::test]
async fn transfer_books_both_sides() {
    let app = app();
    call(&app, json_request("POST", "/user", r#"{"name":"alice"}"#)).await;
    call(&app, json_request("POST", "/user", r#"{"name":"bob"}"#)).await;

    let resp = call(
        &app,
        json_request("POST", "/user/1/transaction", r#"{"amount":-300,"recipient":2,"comment":"pizza"}"#),
    )
    .await;
    let body: TransactionEnvelope = body_json(resp).await;
    assert_eq!(body.transaction.recipient.unwrap().id, 2);

    let resp = call(&app, get("/user/2/transaction")).await;
    let body: Value = body_json(resp).await;
    let incoming = &body["transactions"][0];
    assert_eq!(incoming["amount"], 300);
    assert_eq!(incoming["sender"]["id"], 1);
    assert_eq!(incoming["comment"], "pizza");
}

#[tokio::test]
async fn balance_boundary_is_enforced() {
    let app = app();
    call(&app, json_request("POST", "/user", r#"{"name":"alice"}"#)).await;
    for _ in 0..10 {
        call(&app, json_request("POST", "/user/1/transaction", r#"{"amount":-2000}"#)).await;
    }
    let resp = call(&app, json_request("POST", "/user/1/transaction", r#"{"amount":-1}"#)).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(error_class(&body), "App\\Exception\\AccountBalanceBoundaryException");
}

#[tokio::test]
async fn revert_restores_balance_once() {
    let app = app();
    call(&app, json_request("POST", "/user", r#"{"name":"alice"}"#)).await;
    call(&app, json_request("POST", "/user/1/transaction", r#"{"amount":500}"#)).await;

    let resp = call(&app, json_request("DELETE", "/user/1/transaction/1", "")).await;
    let body: TransactionEnvelope = body_json(resp).await;
    assert!(body.transaction.deleted);
    assert!(!body.transaction.is_deletable);
    assert_eq!(body.transaction.user.balance, 0);

    let resp = call(&app, json_request("DELETE", "/user/1/transaction/1", "")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(error_class(&body), "App\\Exception\\TransactionNotDeletableException");
}

#[tokio::test]
async fn foreign_transaction_is_not_found() {
    let app = app();
    call(&app, json_request("POST", "/user", r#"{"name":"alice"}"#)).await;
    call(&app, json_request("POST", "/user", r#"{"name":"bob"}"#)).await;
    call(&app, json_request("POST", "/user/1/transaction", r#"{"amount":100}"#)).await;

    let resp = call(&app, get("/user/2/transaction/1")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(error_class(&body), "App\\Exception\\TransactionNotFoundException");
}

// --- settings & metrics ---

#[tokio::test]
async fn settings_carry_boundaries() {
    let resp = app().oneshot(get("/settings")).await.unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["settings"]["account"]["boundary"]["lower"], -20000);
    assert_eq!(body["settings"]["i18n"]["currency"]["alpha3"], "EUR");
}

#[tokio::test]
async fn system_metrics_count_as_strings() {
    let app = app();
    call(&app, json_request("POST", "/user", r#"{"name":"alice"}"#)).await;
    call(&app, json_request("POST", "/user/1/transaction", r#"{"amount":100}"#)).await;

    let resp = call(&app, get("/metrics")).await;
    let body: Value = body_json(resp).await;
    assert_eq!(body["userCount"], 1);
    assert_eq!(body["transactionCount"], 1);
    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 30);
    assert_eq!(days.last().unwrap()["count"], "1");
}

#[tokio::test]
async fn unknown_route_is_plain_404() {
    let resp = app().oneshot(get("/nope")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.headers().get(http::header::CONTENT_TYPE).is_none());
    assert!(body_bytes(resp).await.is_empty());
}
