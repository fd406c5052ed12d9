use axum::{
    extract::{Extension, State},
    Json,
};
use reclaim_core::services::gift_code_service::GiftCodeService;
use reclaim_core::{AppState, Claims};
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::gift_code_dto::{RedeemGiftCodeRequest, RedeemGiftCodeResponse};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/gift-codes/redeem",
    request_body = RedeemGiftCodeRequest,
    responses(
        (status = 200, description = "Code redeemed and contribution booked", body = RedeemGiftCodeResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 404, description = "Unknown code", body = ApiErrorResponse),
        (status = 409, description = "Code used, deactivated or expired", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Gift codes"
)]
pub async fn redeem_gift_code(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<RedeemGiftCodeRequest>,
) -> Result<Json<RedeemGiftCodeResponse>, ApiError> {
    let redeemed = GiftCodeService::redeem(&state, claims.user_id()?, payload).await?;
    Ok(Json(redeemed))
}
