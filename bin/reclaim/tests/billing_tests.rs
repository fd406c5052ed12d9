mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use chrono::{Duration, Utc};
use common::fixtures;
use common::{admin_token, backdate_transaction, create_merchant, db_state, server};
use reclaim_core::security::API_KEY_HEADER;
use serde_json::{json, Value};
use serial_test::serial;
use uuid::Uuid;

async fn merchant_contribution(server: &axum_test::TestServer, key: &str, amount: i64) -> Uuid {
    let tx: Value = server
        .post("/api/merchant/contributions")
        .add_header(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_str(key).unwrap(),
        )
        .json(&fixtures::merchant_contribution(&fixtures::email(), amount))
        .await
        .json();
    tx["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
#[serial]
async fn monthly_run_invoices_last_months_pending_contributions_once() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let (merchant, key) = create_merchant(&state, true);

    let partner: Value = server
        .post("/api/admin/partners")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Ocean Allies", "commission_bps": 1_000 }))
        .await
        .json();
    server
        .patch(&format!("/api/admin/merchants/{}", merchant.id))
        .authorization_bearer(&token)
        .json(&json!({ "partner_id": partner["id"] }))
        .await
        .assert_status_ok();

    let billed_a = merchant_contribution(&server, &key, 1_500).await;
    let billed_b = merchant_contribution(&server, &key, 500).await;
    let current = merchant_contribution(&server, &key, 700).await;
    let last_month = Utc::now() - Duration::days(40);
    backdate_transaction(&state, billed_a, last_month);
    backdate_transaction(&state, billed_b, last_month);

    let report: Value = server
        .post("/api/admin/cron/monthly")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(report["billing"]["invoices_created"], 1);
    assert_eq!(report["billing"]["amount_invoiced"], 2_000);
    assert!(report["export_error"].is_null());

    let invoices: Value = server
        .get("/api/admin/invoices")
        .authorization_bearer(&token)
        .add_query_param("merchant_id", merchant.id)
        .await
        .json();
    let invoice = &invoices["invoices"][0];
    assert_eq!(invoice["amount"], 2_000);
    assert_eq!(invoice["commission_amount"], 200);
    assert_eq!(invoice["transaction_count"], 2);
    assert_eq!(invoice["paid"], false);

    // the in-month contribution stays unbilled and in the balance
    let merchant_view: Value = server
        .get(&format!("/api/admin/merchants/{}", merchant.id))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(merchant_view["balance"], 700);

    let current_tx: Value = server
        .get(&format!("/api/admin/transactions/{current}"))
        .authorization_bearer(&token)
        .await
        .json();
    assert!(current_tx["invoice_id"].is_null());

    let rerun: Value = server
        .post("/api/admin/cron/monthly")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(rerun["billing"]["invoices_created"], 0);
    assert_eq!(rerun["billing"]["merchants_skipped"], 1);
}

#[tokio::test]
#[serial]
async fn paying_an_invoice_settles_and_matures_its_transactions() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let (_, key) = create_merchant(&state, true);

    let tx_id = merchant_contribution(&server, &key, 1_000).await;
    backdate_transaction(&state, tx_id, Utc::now() - Duration::days(40));

    let report: Value = server
        .post("/api/admin/cron/monthly")
        .authorization_bearer(&token)
        .await
        .json();
    let invoice_id = report["billing"]["invoice_ids"][0].as_str().unwrap().to_string();

    let paid = server
        .post(&format!("/api/admin/invoices/{invoice_id}/pay"))
        .authorization_bearer(&token)
        .await;
    paid.assert_status_ok();
    let paid: Value = paid.json();
    assert_eq!(paid["invoice"]["paid"], true);
    assert_eq!(paid["transactions_reconciled"], 1);

    let tx: Value = server
        .get(&format!("/api/admin/transactions/{tx_id}"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(tx["payment_status"], "paid");
    assert_eq!(tx["maturation_stage"], 2);
    assert_eq!(tx["matured_impact"], 5_000);

    server
        .post(&format!("/api/admin/invoices/{invoice_id}/pay"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
#[serial]
async fn unpaid_contributions_stop_at_half_past_the_final_stage() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let (_, key) = create_merchant(&state, true);

    let tx_id = merchant_contribution(&server, &key, 1_000).await;
    backdate_transaction(&state, tx_id, Utc::now() - Duration::days(120));

    server
        .post("/api/admin/cron/daily")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    let tx: Value = server
        .get(&format!("/api/admin/transactions/{tx_id}"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(tx["payment_status"], "pending");
    assert_eq!(tx["maturation_stage"], 2);
    assert_eq!(tx["matured_impact"], 5_000);
    assert!(tx["next_maturation_at"].is_null());
}

#[tokio::test]
#[serial]
async fn unknown_invoice_is_not_found() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);

    server
        .post(&format!("/api/admin/invoices/{}/pay", Uuid::new_v4()))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn failing_an_invoiced_transaction_shrinks_the_unpaid_invoice() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let (merchant, key) = create_merchant(&state, true);

    let partner: Value = server
        .post("/api/admin/partners")
        .authorization_bearer(&token)
        .json(&json!({ "name": "River Watch", "commission_bps": 1_000 }))
        .await
        .json();
    server
        .patch(&format!("/api/admin/merchants/{}", merchant.id))
        .authorization_bearer(&token)
        .json(&json!({ "partner_id": partner["id"] }))
        .await
        .assert_status_ok();

    let reversed = merchant_contribution(&server, &key, 1_500).await;
    let kept = merchant_contribution(&server, &key, 500).await;
    let last_month = Utc::now() - Duration::days(40);
    backdate_transaction(&state, reversed, last_month);
    backdate_transaction(&state, kept, last_month);

    let report: Value = server
        .post("/api/admin/cron/monthly")
        .authorization_bearer(&token)
        .await
        .json();
    let invoice_id = report["billing"]["invoice_ids"][0].as_str().unwrap().to_string();

    server
        .post(&format!("/api/admin/transactions/{reversed}/fail"))
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    let invoice: Value = server
        .get(&format!("/api/admin/invoices/{invoice_id}"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(invoice["amount"], 500);
    assert_eq!(invoice["commission_amount"], 50);
    assert_eq!(invoice["transaction_count"], 1);

    // billed amounts already left the balance
    let merchant_view: Value = server
        .get(&format!("/api/admin/merchants/{}", merchant.id))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(merchant_view["balance"], 0);

    let paid: Value = server
        .post(&format!("/api/admin/invoices/{invoice_id}/pay"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(paid["transactions_reconciled"], 1);

    server
        .post(&format!("/api/admin/transactions/{kept}/fail"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::CONFLICT);
}
