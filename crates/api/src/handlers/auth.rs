use axum::{extract::State, Json};
use reclaim_core::services::auth_service::MagicLinkService;
use reclaim_core::AppState;
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::auth_dto::{
    AuthResponse, MagicLinkRequest, MagicLinkResponse, VerifyMagicLinkRequest,
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/auth/magic-link",
    request_body = MagicLinkRequest,
    responses(
        (status = 200, description = "Sign-in link sent if the address is valid", body = MagicLinkResponse),
        (status = 400, description = "Invalid email", body = ApiErrorResponse),
        (status = 502, description = "Email delivery failed", body = ApiErrorResponse)
    ),
    security(()),
    tag = "Authentication"
)]
pub async fn request_magic_link(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MagicLinkRequest>,
) -> Result<Json<MagicLinkResponse>, ApiError> {
    let response = MagicLinkService::request(&state, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/auth/magic-link/verify",
    request_body = VerifyMagicLinkRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Malformed token", body = ApiErrorResponse),
        (status = 401, description = "Unknown, used or expired link", body = ApiErrorResponse)
    ),
    security(()),
    tag = "Authentication"
)]
pub async fn verify_magic_link(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyMagicLinkRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let response = MagicLinkService::verify(&state, payload).await?;
    Ok(Json(response))
}
