use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use reclaim_core::services::contribution_service::ContributionService;
use reclaim_core::services::transaction_service::TransactionService;
use reclaim_core::{AppState, Claims};
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::pagination::PageQuery;
use reclaim_primitives::models::transaction_dto::{
    TransactionFilter, TransactionResponse, TransactionsResponse,
};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/admin/transactions",
    params(TransactionFilter, PageQuery),
    responses(
        (status = 200, description = "Transactions, newest first", body = TransactionsResponse),
        (status = 400, description = "Unknown status filter", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TransactionFilter>,
    Query(page): Query<PageQuery>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let transactions = TransactionService::list(&state, filter, page).await?;
    Ok(Json(transactions))
}

#[utoipa::path(
    get,
    path = "/api/admin/transactions/{transaction_id}",
    params(("transaction_id" = Uuid, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Transaction", body = TransactionResponse),
        (status = 404, description = "Transaction not found", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let tx = TransactionService::get(&state, transaction_id).await?;
    Ok(Json(tx))
}

#[utoipa::path(
    post,
    path = "/api/admin/transactions/{transaction_id}/fail",
    params(("transaction_id" = Uuid, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Transaction failed and totals reversed", body = TransactionResponse),
        (status = 404, description = "Transaction not found", body = ApiErrorResponse),
        (status = 409, description = "Transaction already failed", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn fail_transaction(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let tx = ContributionService::fail_transaction(&state, claims.user_id()?, transaction_id).await?;
    Ok(Json(tx))
}
