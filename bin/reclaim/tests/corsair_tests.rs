mod common;

use axum::http::{header, StatusCode};
use chrono::Utc;
use common::fixtures;
use common::{admin_token, create_user, db_state, db_state_with_corsair, server, user_by_email};
use diesel::prelude::*;
use reclaim_core::AppState;
use reclaim_primitives::models::entities::enum_types::{CertificationStatus, UserRole};
use reclaim_primitives::models::entities::user::User;
use reclaim_primitives::schema::users;
use serde_json::{json, Value};
use serial_test::serial;
use wiremock::matchers::{header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn certified_user(state: &AppState) -> User {
    let (user, _) = create_user(state, &fixtures::email(), UserRole::User);
    let mut conn = state.db.get().unwrap();
    diesel::update(users::table.find(user.id))
        .set((
            users::total_contributed.eq(2_000),
            users::total_impact.eq(20_000),
            users::matured_impact.eq(10_000),
            users::certification_status.eq(CertificationStatus::Certified),
            users::certified_at.eq(Some(Utc::now())),
        ))
        .get_result(&mut conn)
        .unwrap()
}

#[tokio::test]
#[serial]
async fn monthly_run_pushes_certified_users_to_corsair() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/certifications"))
        .and(header_eq("authorization", "Bearer corsair_test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accepted": 1 })))
        .expect(1)
        .mount(&mock)
        .await;

    let Some(state) = db_state_with_corsair(Some(mock.uri())) else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let user = certified_user(&state);

    let report: Value = server
        .post("/api/admin/cron/monthly")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(report["export"]["users_exported"], 1);
    assert_eq!(report["export"]["destination"], "corsair_api");

    assert!(user_by_email(&state, &user.email).corsair_exported_at.is_some());

    // already delivered users are not sent again
    let rerun: Value = server
        .post("/api/admin/cron/monthly")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(rerun["export"]["users_exported"], 0);
}

#[tokio::test]
#[serial]
async fn rejected_push_is_reported_and_users_stay_unexported() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/certifications"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "bad batch" })),
        )
        .mount(&mock)
        .await;

    let Some(state) = db_state_with_corsair(Some(mock.uri())) else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let user = certified_user(&state);

    let response = server
        .post("/api/admin/cron/monthly")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();

    let report: Value = response.json();
    assert!(report["export"].is_null());
    assert!(report["export_error"].as_str().unwrap().contains("bad batch"));
    assert!(report["billing"].is_object());

    assert!(user_by_email(&state, &user.email).corsair_exported_at.is_none());
}

#[tokio::test]
#[serial]
async fn without_corsair_api_the_batch_is_written_to_disk() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let user = certified_user(&state);

    let report: Value = server
        .post("/api/admin/cron/monthly")
        .authorization_bearer(&token)
        .await
        .json();
    let destination = report["export"]["destination"].as_str().unwrap().to_string();
    assert!(destination.ends_with(".csv"));

    let written = std::fs::read_to_string(&destination).unwrap();
    assert!(written.starts_with("user_id,email,name,certified_at"));
    assert!(written.contains(&user.email));

    let _ = std::fs::remove_file(destination);
}

#[tokio::test]
#[serial]
async fn batch_download_returns_csv_and_can_mark_users() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let user = certified_user(&state);
    // uncertified users never appear
    create_user(&state, &fixtures::email(), UserRole::User);

    let response = server
        .get("/api/admin/exports/corsair")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.header(header::CONTENT_TYPE),
        "text/csv; charset=utf-8"
    );
    let disposition = response.header(header::CONTENT_DISPOSITION);
    assert!(disposition.to_str().unwrap().starts_with("attachment; filename=\"corsair-export-"));

    let body = response.text();
    assert_eq!(body.lines().count(), 2);
    assert!(body.contains(&user.email));
    assert!(user_by_email(&state, &user.email).corsair_exported_at.is_none());

    server
        .get("/api/admin/exports/corsair")
        .authorization_bearer(&token)
        .add_query_param("format", "json")
        .add_query_param("mark", true)
        .await
        .assert_status_ok();
    assert!(user_by_email(&state, &user.email).corsair_exported_at.is_some());

    // marked users drop out unless asked for
    let after = server
        .get("/api/admin/exports/corsair")
        .authorization_bearer(&token)
        .await
        .text();
    assert_eq!(after.lines().count(), 0);

    let all = server
        .get("/api/admin/exports/corsair")
        .authorization_bearer(&token)
        .add_query_param("include_exported", true)
        .await
        .text();
    assert_eq!(all.lines().count(), 2);
}

#[tokio::test]
#[serial]
async fn single_user_export_requires_certification() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let token = admin_token(&state);
    let certified = certified_user(&state);
    let (pending, _) = create_user(&state, &fixtures::email(), UserRole::User);

    let response = server
        .get(&format!("/api/admin/users/{}/export", certified.id))
        .authorization_bearer(&token)
        .add_query_param("format", "json")
        .await;
    response.assert_status_ok();
    let batch: Value = response.json();
    assert_eq!(batch["records"][0]["email"], certified.email);
    assert_eq!(batch["records"][0]["matured_impact_grams"], 10_000);

    server
        .get(&format!("/api/admin/users/{}/export", pending.id))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::CONFLICT);

    server
        .get("/api/admin/exports/corsair")
        .authorization_bearer(&token)
        .add_query_param("format", "xml")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
