use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use reclaim_core::services::partner_service::PartnerService;
use reclaim_core::{AppState, Claims};
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::merchant_dto::{
    CreatePartnerRequest, PartnerResponse, PartnersResponse, UpdatePartnerRequest,
};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/admin/partners",
    request_body = CreatePartnerRequest,
    responses(
        (status = 201, description = "Partner created", body = PartnerResponse),
        (status = 400, description = "Invalid input", body = ApiErrorResponse),
        (status = 409, description = "Name already taken", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn create_partner(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreatePartnerRequest>,
) -> Result<(StatusCode, Json<PartnerResponse>), ApiError> {
    let partner = PartnerService::create(&state, claims.user_id()?, payload).await?;
    Ok((StatusCode::CREATED, Json(partner)))
}

#[utoipa::path(
    get,
    path = "/api/admin/partners",
    responses((status = 200, description = "All partners", body = PartnersResponse)),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn list_partners(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PartnersResponse>, ApiError> {
    Ok(Json(PartnerService::list(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/partners/{partner_id}",
    params(("partner_id" = Uuid, Path, description = "Partner id")),
    responses(
        (status = 200, description = "Partner", body = PartnerResponse),
        (status = 404, description = "Partner not found", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn get_partner(
    State(state): State<Arc<AppState>>,
    Path(partner_id): Path<Uuid>,
) -> Result<Json<PartnerResponse>, ApiError> {
    Ok(Json(PartnerService::get(&state, partner_id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/admin/partners/{partner_id}",
    params(("partner_id" = Uuid, Path, description = "Partner id")),
    request_body = UpdatePartnerRequest,
    responses(
        (status = 200, description = "Partner updated", body = PartnerResponse),
        (status = 404, description = "Partner not found", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn update_partner(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(partner_id): Path<Uuid>,
    Json(payload): Json<UpdatePartnerRequest>,
) -> Result<Json<PartnerResponse>, ApiError> {
    let partner = PartnerService::update(&state, claims.user_id()?, partner_id, payload).await?;
    Ok(Json(partner))
}
