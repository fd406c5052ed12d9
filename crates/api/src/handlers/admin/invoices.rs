use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use reclaim_core::services::billing_service::BillingService;
use reclaim_core::{AppState, Claims};
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::invoice_dto::{
    InvoiceFilter, InvoicePaidResponse, InvoiceResponse, InvoicesResponse,
};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/admin/invoices",
    params(InvoiceFilter),
    responses((status = 200, description = "Invoices, newest period first", body = InvoicesResponse)),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn list_invoices(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<InvoiceFilter>,
) -> Result<Json<InvoicesResponse>, ApiError> {
    Ok(Json(BillingService::list(&state, filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/invoices/{invoice_id}",
    params(("invoice_id" = Uuid, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice", body = InvoiceResponse),
        (status = 404, description = "Invoice not found", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    Ok(Json(BillingService::get(&state, invoice_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/invoices/{invoice_id}/pay",
    params(("invoice_id" = Uuid, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice paid and transactions reconciled", body = InvoicePaidResponse),
        (status = 404, description = "Invoice not found", body = ApiErrorResponse),
        (status = 409, description = "Invoice already paid", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn pay_invoice(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<InvoicePaidResponse>, ApiError> {
    let paid = BillingService::mark_invoice_paid(&state, claims.user_id()?, invoice_id).await?;
    Ok(Json(paid))
}
