use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use reclaim_core::services::gift_code_service::GiftCodeService;
use reclaim_core::{AppState, Claims};
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::gift_code_dto::{
    CreateGiftCodesRequest, GiftCodeFilter, GiftCodeResponse, GiftCodesResponse,
};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/admin/gift-codes",
    request_body = CreateGiftCodesRequest,
    responses(
        (status = 201, description = "Gift codes created", body = GiftCodesResponse),
        (status = 400, description = "Invalid input", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn create_gift_codes(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateGiftCodesRequest>,
) -> Result<(StatusCode, Json<GiftCodesResponse>), ApiError> {
    let codes = GiftCodeService::create(&state, claims.user_id()?, payload).await?;
    Ok((StatusCode::CREATED, Json(codes)))
}

#[utoipa::path(
    get,
    path = "/api/admin/gift-codes",
    params(GiftCodeFilter),
    responses((status = 200, description = "Gift codes, newest first", body = GiftCodesResponse)),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn list_gift_codes(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<GiftCodeFilter>,
) -> Result<Json<GiftCodesResponse>, ApiError> {
    Ok(Json(GiftCodeService::list(&state, filter).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/gift-codes/{gift_code_id}/deactivate",
    params(("gift_code_id" = Uuid, Path, description = "Gift code id")),
    responses(
        (status = 200, description = "Gift code deactivated", body = GiftCodeResponse),
        (status = 404, description = "Gift code not found", body = ApiErrorResponse),
        (status = 409, description = "Gift code already used or deactivated", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn deactivate_gift_code(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(gift_code_id): Path<Uuid>,
) -> Result<Json<GiftCodeResponse>, ApiError> {
    let code = GiftCodeService::deactivate(&state, claims.user_id()?, gift_code_id).await?;
    Ok(Json(code))
}
