use axum::{
    extract::{Extension, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use reclaim_core::services::corsair_service::{CorsairService, ExportFile};
use reclaim_core::{AppState, Claims};
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::entities::enum_types::ExportFormat;
use reclaim_primitives::models::export_dto::{ExportFormatQuery, ExportQuery};
use std::sync::Arc;
use uuid::Uuid;

fn download(file: ExportFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, file.format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.body,
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/admin/exports/corsair",
    params(ExportQuery),
    responses(
        (status = 200, description = "CSV or JSON file of certified users", content_type = "text/csv"),
        (status = 400, description = "Unsupported format", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn export_corsair_batch(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let file = CorsairService::export_batch(&state, claims.user_id()?, query).await?;
    Ok(download(file))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{user_id}/export",
    params(
        ("user_id" = Uuid, Path, description = "User id"),
        ExportFormatQuery
    ),
    responses(
        (status = 200, description = "CSV or JSON file for one user", content_type = "text/csv"),
        (status = 404, description = "User not found", body = ApiErrorResponse),
        (status = 409, description = "User is not certified", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn export_corsair_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ExportFormatQuery>,
) -> Result<Response, ApiError> {
    let format = query
        .format
        .as_deref()
        .map(ExportFormat::parse)
        .transpose()?
        .unwrap_or_default();

    let file = CorsairService::export_user(&state, claims.user_id()?, user_id, format).await?;
    Ok(download(file))
}
