use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use reclaim_core::services::merchant_service::MerchantService;
use reclaim_core::{AppState, Claims};
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::merchant_dto::{
    CreateMerchantRequest, MerchantKeyResponse, MerchantResponse, MerchantsResponse,
    UpdateMerchantRequest,
};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/admin/merchants",
    request_body = CreateMerchantRequest,
    responses(
        (status = 201, description = "Merchant created; the API key is shown only once", body = MerchantKeyResponse),
        (status = 400, description = "Invalid input or unknown partner", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn create_merchant(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateMerchantRequest>,
) -> Result<(StatusCode, Json<MerchantKeyResponse>), ApiError> {
    let created = MerchantService::create(&state, claims.user_id()?, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/admin/merchants",
    responses((status = 200, description = "All merchants", body = MerchantsResponse)),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn list_merchants(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MerchantsResponse>, ApiError> {
    Ok(Json(MerchantService::list(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/merchants/{merchant_id}",
    params(("merchant_id" = Uuid, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "Merchant", body = MerchantResponse),
        (status = 404, description = "Merchant not found", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn get_merchant(
    State(state): State<Arc<AppState>>,
    Path(merchant_id): Path<Uuid>,
) -> Result<Json<MerchantResponse>, ApiError> {
    Ok(Json(MerchantService::get(&state, merchant_id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/admin/merchants/{merchant_id}",
    params(("merchant_id" = Uuid, Path, description = "Merchant id")),
    request_body = UpdateMerchantRequest,
    responses(
        (status = 200, description = "Merchant updated", body = MerchantResponse),
        (status = 400, description = "Invalid input", body = ApiErrorResponse),
        (status = 404, description = "Merchant not found", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn update_merchant(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(merchant_id): Path<Uuid>,
    Json(payload): Json<UpdateMerchantRequest>,
) -> Result<Json<MerchantResponse>, ApiError> {
    let merchant = MerchantService::update(&state, claims.user_id()?, merchant_id, payload).await?;
    Ok(Json(merchant))
}

#[utoipa::path(
    post,
    path = "/api/admin/merchants/{merchant_id}/rotate-key",
    params(("merchant_id" = Uuid, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "New API key; the old one stops working", body = MerchantKeyResponse),
        (status = 404, description = "Merchant not found", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn rotate_merchant_key(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(merchant_id): Path<Uuid>,
) -> Result<Json<MerchantKeyResponse>, ApiError> {
    let rotated = MerchantService::rotate_key(&state, claims.user_id()?, merchant_id).await?;
    Ok(Json(rotated))
}
