use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use reclaim_core::security::AuthenticatedMerchant;
use reclaim_core::services::contribution_service::ContributionService;
use reclaim_core::AppState;
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::merchant_dto::MerchantResponse;
use reclaim_primitives::models::transaction_dto::{
    MerchantContributionRequest, TransactionResponse,
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/merchant/contributions",
    request_body = MerchantContributionRequest,
    responses(
        (status = 201, description = "Contribution recorded", body = TransactionResponse),
        (status = 200, description = "Idempotency key replayed, existing transaction returned", body = TransactionResponse),
        (status = 400, description = "Invalid input", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ApiErrorResponse)
    ),
    security(("merchantApiKey" = [])),
    tag = "Merchant"
)]
pub async fn merchant_contribution(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedMerchant(merchant)): Extension<AuthenticatedMerchant>,
    Json(payload): Json<MerchantContributionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let outcome = ContributionService::record_for_merchant(&state, &merchant, payload).await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome.transaction.into())))
}

#[utoipa::path(
    get,
    path = "/api/merchant/me",
    responses(
        (status = 200, description = "The merchant owning the API key", body = MerchantResponse),
        (status = 401, description = "Missing or invalid API key", body = ApiErrorResponse)
    ),
    security(("merchantApiKey" = [])),
    tag = "Merchant"
)]
pub async fn merchant_profile(
    Extension(AuthenticatedMerchant(merchant)): Extension<AuthenticatedMerchant>,
) -> Json<MerchantResponse> {
    Json(merchant.into())
}
