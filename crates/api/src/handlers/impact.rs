use axum::{
    extract::{Query, State},
    Json,
};
use reclaim_core::services::contribution_service::ContributionService;
use reclaim_core::AppState;
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::impact_dto::{QuoteQuery, QuoteResponse};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/impact/quote",
    params(QuoteQuery),
    responses(
        (status = 200, description = "Impact preview for an amount", body = QuoteResponse),
        (status = 400, description = "Invalid amount", body = ApiErrorResponse),
        (status = 404, description = "Merchant not found", body = ApiErrorResponse)
    ),
    security(()),
    tag = "Impact"
)]
pub async fn quote_impact(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let quote = ContributionService::quote(&state, query).await?;
    Ok(Json(quote))
}
