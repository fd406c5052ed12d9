mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use common::fixtures;
use common::{admin_token, create_merchant, db_state, server, user_by_email};
use reclaim_core::security::API_KEY_HEADER;
use reclaim_primitives::models::entities::enum_types::{CertificationStatus, UserRole};
use serde_json::{json, Value};
use serial_test::serial;

fn api_key(key: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(API_KEY_HEADER),
        HeaderValue::from_str(key).unwrap(),
    )
}

#[tokio::test]
#[serial]
async fn admin_contribution_books_instant_impact() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let email = fixtures::email();

    // 20.00 EUR at 1000 g per unit and 1.0x
    let response = server
        .post("/api/admin/contributions")
        .authorization_bearer(&token)
        .json(&fixtures::contribution(&email, 2_000))
        .await;
    response.assert_status(StatusCode::CREATED);

    let tx: Value = response.json();
    assert_eq!(tx["impact"], 20_000);
    assert_eq!(tx["matured_impact"], 1_000);
    assert_eq!(tx["maturation_stage"], 1);
    assert_eq!(tx["payment_status"], "paid");
    assert_eq!(tx["payment_mode"], "direct");

    let user = user_by_email(&state, &email);
    assert_eq!(user.total_contributed, 2_000);
    assert_eq!(user.total_impact, 20_000);
    assert_eq!(user.matured_impact, 1_000);
    assert_eq!(user.certification_status, CertificationStatus::Uncertified);
}

#[tokio::test]
#[serial]
async fn replayed_idempotency_key_returns_the_original() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let email = fixtures::email();
    let body = fixtures::contribution(&email, 500);

    let first = server
        .post("/api/admin/contributions")
        .authorization_bearer(&token)
        .json(&body)
        .await;
    first.assert_status(StatusCode::CREATED);

    let second = server
        .post("/api/admin/contributions")
        .authorization_bearer(&token)
        .json(&body)
        .await;
    second.assert_status_ok();

    assert_eq!(first.json::<Value>()["id"], second.json::<Value>()["id"]);
    assert_eq!(user_by_email(&state, &email).total_contributed, 500);
}

#[tokio::test]
#[serial]
async fn override_multiplier_wins_and_gift_mode_is_refused() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let email = fixtures::email();

    let mut body = fixtures::contribution(&email, 1_000);
    body["multiplier_bps"] = json!(15_000);
    let tx: Value = server
        .post("/api/admin/contributions")
        .authorization_bearer(&token)
        .json(&body)
        .await
        .json();
    assert_eq!(tx["multiplier_bps"], 15_000);
    assert_eq!(tx["impact"], 15_000);

    let mut gift = fixtures::contribution(&email, 1_000);
    gift["payment_mode"] = json!("gift_code");
    server
        .post("/api/admin/contributions")
        .authorization_bearer(&token)
        .json(&gift)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn merchant_contribution_is_pending_until_invoiced() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let (merchant, key) = create_merchant(&state, true);
    let (name, value) = api_key(&key);

    let response = server
        .post("/api/merchant/contributions")
        .add_header(name.clone(), value.clone())
        .json(&fixtures::merchant_contribution(&fixtures::email(), 1_200))
        .await;
    response.assert_status(StatusCode::CREATED);

    let tx: Value = response.json();
    assert_eq!(tx["payment_status"], "pending");
    assert_eq!(tx["payment_mode"], "merchant");
    assert_eq!(tx["merchant_id"], merchant.id.to_string());

    let profile: Value = server
        .get("/api/merchant/me")
        .add_header(name, value)
        .await
        .json();
    assert_eq!(profile["balance"], 1_200);
}

#[tokio::test]
#[serial]
async fn merchants_without_billing_record_paid_contributions() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let (_, key) = create_merchant(&state, false);
    let (name, value) = api_key(&key);

    let tx: Value = server
        .post("/api/merchant/contributions")
        .add_header(name.clone(), value.clone())
        .json(&fixtures::merchant_contribution(&fixtures::email(), 800))
        .await
        .json();
    assert_eq!(tx["payment_status"], "paid");

    let profile: Value = server.get("/api/merchant/me").add_header(name, value).await.json();
    assert_eq!(profile["balance"], 0);
}

#[tokio::test]
#[serial]
async fn rotated_keys_stop_working() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let (merchant, old_key) = create_merchant(&state, true);

    let rotated: Value = server
        .post(&format!("/api/admin/merchants/{}/rotate-key", merchant.id))
        .authorization_bearer(&token)
        .await
        .json();
    let new_key = rotated["api_key"].as_str().unwrap().to_string();
    assert_ne!(new_key, old_key);

    let (name, value) = api_key(&old_key);
    server
        .get("/api/merchant/me")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let (name, value) = api_key(&new_key);
    server.get("/api/merchant/me").add_header(name, value).await.assert_status_ok();
}

#[tokio::test]
#[serial]
async fn idempotency_key_from_another_merchant_conflicts() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let (merchant_a, key_a) = create_merchant(&state, true);
    let (_, key_b) = create_merchant(&state, true);
    let email = fixtures::email();
    let body = json!({
        "customer_email": email,
        "amount": 1_200,
        "idempotency_key": "order-0001",
    });

    let (name, value) = api_key(&key_a);
    server
        .post("/api/merchant/contributions")
        .add_header(name.clone(), value.clone())
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);

    let (other_name, other_value) = api_key(&key_b);
    let clash = server
        .post("/api/merchant/contributions")
        .add_header(other_name, other_value)
        .json(&json!({
            "customer_email": email,
            "amount": 9_900,
            "idempotency_key": "order-0001",
        }))
        .await;
    clash.assert_status(StatusCode::CONFLICT);
    let error: Value = clash.json();
    assert_eq!(error["code"], "conflict");
    assert!(error.get("merchant_id").is_none());

    let replay = server
        .post("/api/merchant/contributions")
        .add_header(name, value)
        .json(&body)
        .await;
    replay.assert_status_ok();
    let replay: Value = replay.json();
    assert_eq!(replay["merchant_id"], merchant_a.id.to_string());
    assert_eq!(replay["amount"], 1_200);

    let user = user_by_email(&state, &email);
    assert_eq!(user.total_contributed, 1_200);
}

#[tokio::test]
#[serial]
async fn failing_a_transaction_reverses_totals_and_balance() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let (merchant, key) = create_merchant(&state, true);
    let (name, value) = api_key(&key);
    let email = fixtures::email();

    let tx: Value = server
        .post("/api/merchant/contributions")
        .add_header(name, value)
        .json(&fixtures::merchant_contribution(&email, 1_000))
        .await
        .json();
    let tx_id = tx["id"].as_str().unwrap().to_string();

    let failed = server
        .post(&format!("/api/admin/transactions/{tx_id}/fail"))
        .authorization_bearer(&token)
        .await;
    failed.assert_status_ok();
    let failed: Value = failed.json();
    assert_eq!(failed["payment_status"], "failed");
    assert!(failed["next_maturation_at"].is_null());

    let user = user_by_email(&state, &email);
    assert_eq!(user.total_contributed, 0);
    assert_eq!(user.total_impact, 0);
    assert_eq!(user.matured_impact, 0);

    let merchant: Value = server
        .get(&format!("/api/admin/merchants/{}", merchant.id))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(merchant["balance"], 0);

    server
        .post(&format!("/api/admin/transactions/{tx_id}/fail"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
#[serial]
async fn users_only_see_their_own_transactions() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let owner_email = fixtures::email();

    let tx: Value = server
        .post("/api/admin/contributions")
        .authorization_bearer(&token)
        .json(&fixtures::contribution(&owner_email, 300))
        .await
        .json();
    let tx_id = tx["id"].as_str().unwrap().to_string();

    let owner = user_by_email(&state, &owner_email);
    let owner_token =
        reclaim_core::SecurityConfig::create_token(&state, owner.id, UserRole::User).unwrap();
    let (_, other_token) = common::create_user(&state, &fixtures::email(), UserRole::User);

    let list: Value = server
        .get("/api/me/transactions")
        .authorization_bearer(&owner_token)
        .await
        .json();
    assert_eq!(list["transactions"].as_array().unwrap().len(), 1);

    server
        .get(&format!("/api/me/transactions/{tx_id}"))
        .authorization_bearer(&other_token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn quote_uses_merchant_multiplier() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let (merchant, _) = create_merchant(&state, true);

    server
        .patch(&format!("/api/admin/merchants/{}", merchant.id))
        .authorization_bearer(&token)
        .json(&json!({ "multiplier_bps": 20_000 }))
        .await
        .assert_status_ok();

    let quote: Value = server
        .get("/api/impact/quote")
        .add_query_param("amount", 1_000)
        .add_query_param("merchant_id", merchant.id)
        .await
        .json();
    assert_eq!(quote["multiplier_bps"], 20_000);
    assert_eq!(quote["impact"], 20_000);
    assert_eq!(quote["currency"], "EUR");
}
