use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerState, router};

async fn test_router() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Arc::new(Engine::builder().database(db).build().await.unwrap());
    router(ServerState::new(engine, None))
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn expense_round_trip_through_the_api() {
    let router = test_router().await;

    let (status, account) = send(
        &router,
        "POST",
        "/accounts",
        Some(json!({"name": "Cash", "kind": "cash", "balance_minor": 10_000})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let account_id = account["id"].as_str().unwrap().to_string();

    let (status, category) = send(
        &router,
        "POST",
        "/categories",
        Some(json!({"name": "Food", "kind": "expense"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_str().unwrap().to_string();

    let (status, tx) = send(
        &router,
        "POST",
        "/transactions",
        Some(json!({
            "kind": "expense",
            "amount_minor": 2_200,
            "account_id": account_id,
            "category_id": category_id,
            "description": "americano",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["kind"], "expense");
    assert_eq!(tx["amount_minor"], 2_200);
    assert_eq!(tx["currency"], "TJS");

    let (status, fetched) = send(
        &router,
        "GET",
        &format!("/accounts/{account_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["balance_minor"], 7_800);

    let (status, listed) = send(&router, "GET", "/transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn debt_posting_shows_up_in_the_debts_list() {
    let router = test_router().await;

    let (_, account) = send(
        &router,
        "POST",
        "/accounts",
        Some(json!({"name": "Main", "kind": "cash", "balance_minor": 50_000})),
    )
    .await;
    let account_id = account["id"].as_str().unwrap().to_string();

    let (status, tx) = send(
        &router,
        "POST",
        "/transactions",
        Some(json!({
            "kind": "debt",
            "amount_minor": 5_000,
            "account_id": account_id,
            "person": "Ivan",
            "debt_kind": "i_gave",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(tx["account_to_id"].is_string());

    let (status, debts) = send(&router, "GET", "/accounts/debts/list", None).await;
    assert_eq!(status, StatusCode::OK);
    let debts = debts.as_array().unwrap().clone();
    assert_eq!(debts.len(), 1);
    assert_eq!(debts[0]["debt_person"], "Ivan");
    assert_eq!(debts[0]["balance_minor"], 5_000);

    let debt_id = debts[0]["id"].as_str().unwrap().to_string();
    let (status, closed) = send(
        &router,
        "PATCH",
        &format!("/accounts/{debt_id}/close-debt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["is_hidden"], true);

    let (status, regular) = send(&router, "GET", "/accounts/regular/list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(regular.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_transfer_is_a_400_with_an_error_kind() {
    let router = test_router().await;

    let (_, account) = send(
        &router,
        "POST",
        "/accounts",
        Some(json!({"name": "Cash", "kind": "cash"})),
    )
    .await;
    let account_id = account["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &router,
        "POST",
        "/transactions",
        Some(json!({
            "kind": "transfer",
            "amount_minor": 1_000,
            "account_id": account_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_request");
    assert!(body["error"].as_str().unwrap().contains("account_to_id"));
}

#[tokio::test]
async fn unknown_ids_are_404() {
    let router = test_router().await;
    let missing = uuid::Uuid::new_v4();

    for uri in [
        format!("/accounts/{missing}"),
        format!("/categories/{missing}"),
        format!("/transactions/{missing}"),
    ] {
        let (status, body) = send(&router, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {uri}");
        assert_eq!(body["kind"], "not_found");
    }
}

#[tokio::test]
async fn deleting_a_transaction_restores_the_balance() {
    let router = test_router().await;

    let (_, account) = send(
        &router,
        "POST",
        "/accounts",
        Some(json!({"name": "Cash", "kind": "cash", "balance_minor": 10_000})),
    )
    .await;
    let account_id = account["id"].as_str().unwrap().to_string();
    let (_, category) = send(
        &router,
        "POST",
        "/categories",
        Some(json!({"name": "Food", "kind": "expense"})),
    )
    .await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let (_, tx) = send(
        &router,
        "POST",
        "/transactions",
        Some(json!({
            "kind": "expense",
            "amount_minor": 2_500,
            "account_id": account_id,
            "category_id": category_id,
        })),
    )
    .await;
    let tx_id = tx["id"].as_str().unwrap().to_string();

    let (status, _) = send(&router, "DELETE", &format!("/transactions/{tx_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, fetched) = send(&router, "GET", &format!("/accounts/{account_id}"), None).await;
    assert_eq!(fetched["balance_minor"], 10_000);
}

#[tokio::test]
async fn ai_parse_without_configuration_reports_a_readable_error() {
    let router = test_router().await;

    let (status, body) = send(
        &router,
        "POST",
        "/ai/parse",
        Some(json!({"text": "coffee 22"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("not configured"));
}
