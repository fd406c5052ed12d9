use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use reclaim_core::services::transaction_service::TransactionService;
use reclaim_core::services::user_service::UserService;
use reclaim_core::{AppState, Claims};
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::pagination::PageQuery;
use reclaim_primitives::models::transaction_dto::{TransactionResponse, TransactionsResponse};
use reclaim_primitives::models::user_dto::{UserImpactResponse, UserSummaryDto};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current user", body = UserSummaryDto),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Me"
)]
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserSummaryDto>, ApiError> {
    let user = UserService::me(&state, claims.user_id()?).await?;
    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/api/me/impact",
    responses(
        (status = 200, description = "Impact totals and vesting breakdown", body = UserImpactResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Me"
)]
pub async fn my_impact(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserImpactResponse>, ApiError> {
    let impact = UserService::impact(&state, claims.user_id()?).await?;
    Ok(Json(impact))
}

#[utoipa::path(
    get,
    path = "/api/me/transactions",
    params(PageQuery),
    responses(
        (status = 200, description = "Own transactions, newest first", body = TransactionsResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Me"
)]
pub async fn my_transactions(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(page): Query<PageQuery>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let transactions = TransactionService::list_for_user(&state, claims.user_id()?, page).await?;
    Ok(Json(transactions))
}

#[utoipa::path(
    get,
    path = "/api/me/transactions/{transaction_id}",
    params(("transaction_id" = Uuid, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Transaction details", body = TransactionResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 404, description = "Transaction not found", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Me"
)]
pub async fn my_transaction(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let tx = TransactionService::get_for_user(&state, claims.user_id()?, transaction_id).await?;
    Ok(Json(tx))
}
