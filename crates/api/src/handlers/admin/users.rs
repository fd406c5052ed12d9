use axum::{
    extract::{Path, Query, State},
    Json,
};
use reclaim_core::services::user_service::UserService;
use reclaim_core::AppState;
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::pagination::PageQuery;
use reclaim_primitives::models::user_dto::{UserSummaryDto, UsersResponse};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(PageQuery),
    responses((status = 200, description = "Users, newest first", body = UsersResponse)),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<UsersResponse>, ApiError> {
    Ok(Json(UserService::list(&state, page).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserSummaryDto),
        (status = 404, description = "User not found", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserSummaryDto>, ApiError> {
    Ok(Json(UserService::get(&state, user_id).await?))
}
