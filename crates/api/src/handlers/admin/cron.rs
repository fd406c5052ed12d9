use axum::{
    extract::{Extension, State},
    Json,
};
use reclaim_core::services::cron_service::CronService;
use reclaim_core::{AppState, Claims};
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::cron_dto::{CronRequest, DailyCronResponse, MonthlyCronResponse};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/admin/cron/daily",
    request_body(content = Option<CronRequest>, description = "Optional reference time"),
    responses(
        (status = 200, description = "Maturation report", body = DailyCronResponse),
        (status = 403, description = "Admin role required", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Cron"
)]
pub async fn run_daily(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    payload: Option<Json<CronRequest>>,
) -> Result<Json<DailyCronResponse>, ApiError> {
    let reference = payload.and_then(|Json(req)| req.reference_time);
    let report = CronService::run_daily(&state, Some(claims.user_id()?), reference).await?;
    Ok(Json(report))
}

#[utoipa::path(
    post,
    path = "/api/admin/cron/monthly",
    request_body(content = Option<CronRequest>, description = "Optional reference time"),
    responses(
        (status = 200, description = "Billing and export report", body = MonthlyCronResponse),
        (status = 403, description = "Admin role required", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Cron"
)]
pub async fn run_monthly(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    payload: Option<Json<CronRequest>>,
) -> Result<Json<MonthlyCronResponse>, ApiError> {
    let reference = payload.and_then(|Json(req)| req.reference_time);
    let report = CronService::run_monthly(&state, Some(claims.user_id()?), reference).await?;
    Ok(Json(report))
}
