use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use reclaim_core::services::contribution_service::ContributionService;
use reclaim_core::{AppState, Claims};
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::transaction_dto::{RecordContributionRequest, TransactionResponse};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/admin/contributions",
    request_body = RecordContributionRequest,
    responses(
        (status = 201, description = "Contribution recorded", body = TransactionResponse),
        (status = 200, description = "Idempotency key replayed", body = TransactionResponse),
        (status = 400, description = "Invalid input", body = ApiErrorResponse),
        (status = 403, description = "Admin role required", body = ApiErrorResponse),
        (status = 404, description = "Merchant not found", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn record_contribution(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<RecordContributionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let outcome = ContributionService::record(&state, claims.user_id()?, payload).await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome.transaction.into())))
}
