mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::fixtures;
use common::{db_state, server, user_by_email, ADMIN_EMAIL};
use diesel::prelude::*;
use reclaim_core::repositories::MagicLinkRepository;
use reclaim_core::security::SecurityConfig;
use reclaim_primitives::models::entities::enum_types::UserRole;
use reclaim_primitives::models::entities::magic_link::NewMagicLink;
use reclaim_primitives::schema::magic_links;
use serde_json::{json, Value};
use serial_test::serial;

fn issue_link(state: &reclaim_core::AppState, user_id: uuid::Uuid, ttl: Duration) -> String {
    let raw = SecurityConfig::generate_token(48);
    let mut conn = state.db.get().unwrap();
    MagicLinkRepository::create(
        &mut conn,
        NewMagicLink {
            user_id,
            token_hash: SecurityConfig::hash_secret(&raw),
            expires_at: Utc::now() + ttl,
        },
    )
    .unwrap();
    raw
}

#[tokio::test]
#[serial]
async fn request_creates_user_and_stores_only_a_hash() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let email = fixtures::email();

    let response = server
        .post("/api/auth/magic-link")
        .json(&json!({ "email": email.to_uppercase(), "name": "Ada" }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "If the address is valid, a sign-in link has been sent"
    );

    let user = user_by_email(&state, &email);
    assert_eq!(user.role, UserRole::User);

    let mut conn = state.db.get().unwrap();
    let hashes: Vec<String> = magic_links::table
        .filter(magic_links::user_id.eq(user.id))
        .select(magic_links::token_hash)
        .load(&mut conn)
        .unwrap();
    assert_eq!(hashes.len(), 1);
    assert_eq!(hashes[0].len(), 64);
}

#[tokio::test]
#[serial]
async fn admin_emails_get_the_admin_role() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());

    server
        .post("/api/auth/magic-link")
        .json(&json!({ "email": ADMIN_EMAIL }))
        .await
        .assert_status_ok();

    assert_eq!(user_by_email(&state, ADMIN_EMAIL).role, UserRole::Admin);
}

#[tokio::test]
#[serial]
async fn verify_issues_a_working_token_once() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let (user, _) = common::create_user(&state, &fixtures::email(), UserRole::User);
    let raw = issue_link(&state, user.id, Duration::minutes(15));

    let response = server
        .post("/api/auth/magic-link/verify")
        .json(&json!({ "token": raw }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["id"], user.id.to_string());

    let me = server.get("/api/me").authorization_bearer(&token).await;
    me.assert_status_ok();
    assert_eq!(me.json::<Value>()["email"], user.email);

    // single use
    server
        .post("/api/auth/magic-link/verify")
        .json(&json!({ "token": raw }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn expired_and_unknown_links_are_rejected() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let (user, _) = common::create_user(&state, &fixtures::email(), UserRole::User);
    let expired = issue_link(&state, user.id, Duration::minutes(-1));

    server
        .post("/api/auth/magic-link/verify")
        .json(&json!({ "token": expired }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .post("/api/auth/magic-link/verify")
        .json(&json!({ "token": SecurityConfig::generate_token(48) }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn purge_removes_expired_and_used_links() {
    let Some(state) = db_state() else { return };
    let server = server(state.clone());
    let (user, _) = common::create_user(&state, &fixtures::email(), UserRole::User);
    issue_link(&state, user.id, Duration::minutes(-5));
    let spent = issue_link(&state, user.id, Duration::minutes(5));
    let live = issue_link(&state, user.id, Duration::minutes(5));

    server
        .post("/api/auth/magic-link/verify")
        .json(&json!({ "token": spent }))
        .await
        .assert_status_ok();

    let mut conn = state.db.get().unwrap();
    let removed =
        reclaim_core::services::auth_service::MagicLinkService::purge_stale(&mut conn).unwrap();
    assert_eq!(removed, 2);

    let remaining: Vec<String> = magic_links::table
        .filter(magic_links::user_id.eq(user.id))
        .select(magic_links::token_hash)
        .load(&mut conn)
        .unwrap();
    assert_eq!(remaining, vec![SecurityConfig::hash_secret(&live)]);
}
