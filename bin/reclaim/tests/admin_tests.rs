mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use chrono::{Duration, Utc};
use common::fixtures;
use common::{admin_token, backdate_transaction, create_merchant, create_user, db_state, server};
use reclaim_core::security::API_KEY_HEADER;
use reclaim_primitives::models::entities::enum_types::UserRole;
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
async fn user_listing_pages_and_tolerates_huge_pages() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    for _ in 0..4 {
        create_user(&state, &fixtures::email(), UserRole::User);
    }

    let first: Value = server
        .get("/api/admin/users")
        .authorization_bearer(&token)
        .add_query_param("per_page", 2)
        .await
        .json();
    assert_eq!(first["users"].as_array().unwrap().len(), 2);
    assert_eq!(first["page"], 1);
    assert_eq!(first["per_page"], 2);

    let last: Value = server
        .get("/api/admin/users")
        .authorization_bearer(&token)
        .add_query_param("per_page", 2)
        .add_query_param("page", 3)
        .await
        .json();
    assert_eq!(last["users"].as_array().unwrap().len(), 1);

    let first_ids: Vec<&Value> = first["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| &u["id"])
        .collect();
    assert!(!first_ids.contains(&&last["users"][0]["id"]));

    let beyond = server
        .get("/api/admin/users")
        .authorization_bearer(&token)
        .add_query_param("page", i64::MAX)
        .add_query_param("per_page", 200)
        .await;
    beyond.assert_status_ok();
    let beyond: Value = beyond.json();
    assert!(beyond["users"].as_array().unwrap().is_empty());

    let (_, user_token) = create_user(&state, &fixtures::email(), UserRole::User);
    let mine = server
        .get("/api/me/transactions")
        .authorization_bearer(&user_token)
        .add_query_param("page", i64::MAX)
        .await;
    mine.assert_status_ok();
}

#[tokio::test]
#[serial]
async fn deactivated_merchant_is_locked_out_and_not_billed() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let (merchant, key) = create_merchant(&state, true);
    let (name, value) = api_key(&key);

    let tx: Value = server
        .post("/api/merchant/contributions")
        .add_header(name.clone(), value.clone())
        .json(&fixtures::merchant_contribution(&fixtures::email(), 1_000))
        .await
        .json();
    let tx_id = tx["id"].as_str().unwrap().parse().unwrap();
    backdate_transaction(&state, tx_id, Utc::now() - Duration::days(40));

    let updated: Value = server
        .patch(&format!("/api/admin/merchants/{}", merchant.id))
        .authorization_bearer(&token)
        .json(&json!({ "is_active": false }))
        .await
        .json();
    assert_eq!(updated["is_active"], false);

    server
        .post("/api/merchant/contributions")
        .add_header(name.clone(), value.clone())
        .json(&fixtures::merchant_contribution(&fixtures::email(), 1_000))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .get("/api/merchant/me")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let report: Value = server
        .post("/api/admin/cron/monthly")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(report["billing"]["merchants_examined"], 0);
    assert_eq!(report["billing"]["invoices_created"], 0);

    let invoices: Value = server
        .get("/api/admin/invoices")
        .authorization_bearer(&token)
        .add_query_param("merchant_id", merchant.id)
        .await
        .json();
    assert!(invoices["invoices"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn partner_commission_change_applies_to_the_next_invoice() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let (merchant, key) = create_merchant(&state, true);

    let partner: Value = server
        .post("/api/admin/partners")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Harbor Cleanup", "commission_bps": 1_000 }))
        .await
        .json();
    let partner_id = partner["id"].as_str().unwrap().to_string();

    let updated = server
        .patch(&format!("/api/admin/partners/{partner_id}"))
        .authorization_bearer(&token)
        .json(&json!({ "commission_bps": 2_500 }))
        .await;
    updated.assert_status_ok();
    let updated: Value = updated.json();
    assert_eq!(updated["commission_bps"], 2_500);
    assert_eq!(updated["name"], "Harbor Cleanup");

    server
        .patch(&format!("/api/admin/partners/{partner_id}"))
        .authorization_bearer(&token)
        .json(&json!({ "commission_bps": 10_001 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .patch(&format!("/api/admin/merchants/{}", merchant.id))
        .authorization_bearer(&token)
        .json(&json!({ "partner_id": partner_id }))
        .await
        .assert_status_ok();

    let (name, value) = api_key(&key);
    let tx: Value = server
        .post("/api/merchant/contributions")
        .add_header(name, value)
        .json(&fixtures::merchant_contribution(&fixtures::email(), 2_000))
        .await
        .json();
    backdate_transaction(
        &state,
        tx["id"].as_str().unwrap().parse().unwrap(),
        Utc::now() - Duration::days(40),
    );

    let report: Value = server
        .post("/api/admin/cron/monthly")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(report["billing"]["invoices_created"], 1);

    let invoices: Value = server
        .get("/api/admin/invoices")
        .authorization_bearer(&token)
        .add_query_param("merchant_id", merchant.id)
        .await
        .json();
    assert_eq!(invoices["invoices"][0]["commission_amount"], 500);
}
