mod common;

use axum::http::StatusCode;
use common::fixtures;
use common::{admin_token, db_state, server};
use serde_json::{json, Value};
use serial_test::serial;

fn entry<'a>(settings: &'a Value, key: &str) -> &'a Value {
    settings["settings"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["key"] == key)
        .unwrap()
}

#[tokio::test]
#[serial]
async fn defaults_are_listed_until_overridden() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);

    let settings: Value = server
        .get("/api/admin/settings")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(settings["settings"].as_array().unwrap().len(), 6);
    let grams = entry(&settings, "grams_per_unit");
    assert_eq!(grams["value"], "1000");
    assert_eq!(grams["is_default"], true);

    let updated = server
        .put("/api/admin/settings/grams_per_unit")
        .authorization_bearer(&token)
        .json(&json!({ "value": "2500" }))
        .await;
    updated.assert_status_ok();
    assert_eq!(updated.json::<Value>()["is_default"], false);

    // new value applies to the next contribution
    let tx: Value = server
        .post("/api/admin/contributions")
        .authorization_bearer(&token)
        .json(&fixtures::contribution(&fixtures::email(), 100))
        .await
        .json();
    assert_eq!(tx["impact"], 2_500);
}

#[tokio::test]
#[serial]
async fn invalid_updates_are_rejected() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);

    for (key, value) in [
        ("grams_per_unit", "0"),
        ("grams_per_unit", "many"),
        ("maturation_first_stage_days", "90"),
        ("maturation_final_stage_days", "30"),
        ("maturation_final_stage_days", "3651"),
        ("maturation_final_stage_days", "1000000000"),
        ("magic_link_ttl_minutes", "5000"),
        ("no_such_setting", "1"),
    ] {
        server
            .put(&format!("/api/admin/settings/{key}"))
            .authorization_bearer(&token)
            .json(&json!({ "value": value }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    // moving both stages works when done in order
    server
        .put("/api/admin/settings/maturation_final_stage_days")
        .authorization_bearer(&token)
        .json(&json!({ "value": "180" }))
        .await
        .assert_status_ok();
    server
        .put("/api/admin/settings/maturation_first_stage_days")
        .authorization_bearer(&token)
        .json(&json!({ "value": "120" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
#[serial]
async fn largest_accepted_settings_still_book_contributions() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);

    for (key, value) in [
        ("grams_per_unit", "1000000000000"),
        ("maturation_final_stage_days", "3650"),
        ("maturation_first_stage_days", "3649"),
    ] {
        server
            .put(&format!("/api/admin/settings/{key}"))
            .authorization_bearer(&token)
            .json(&json!({ "value": value }))
            .await
            .assert_status_ok();
    }

    let email = fixtures::email();
    let response = server
        .post("/api/admin/contributions")
        .authorization_bearer(&token)
        .json(&fixtures::contribution(&email, 100_000_000))
        .await;
    response.assert_status(StatusCode::CREATED);
    let tx: Value = response.json();
    assert_eq!(tx["impact"], 1_000_000_000_000_000_000_i64);
    assert_eq!(tx["matured_impact"], 50_000_000_000_000_000_i64);
    assert_eq!(tx["maturation_stage"], 1);

    server
        .post("/api/admin/cron/daily")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
}

#[tokio::test]
#[serial]
async fn setting_changes_are_audited() {
    use diesel::prelude::*;
    use reclaim_primitives::schema::audit_logs;

    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);

    server
        .put("/api/admin/settings/certification_threshold_grams")
        .authorization_bearer(&token)
        .json(&json!({ "value": "50000" }))
        .await
        .assert_status_ok();

    let mut conn = state.db.get().unwrap();
    let events: Vec<String> = audit_logs::table
        .filter(audit_logs::target_id.eq("certification_threshold_grams"))
        .select(audit_logs::action)
        .load(&mut conn)
        .unwrap();
    assert_eq!(events, vec!["settings.update".to_string()]);
}
