use axum::{
    extract::{Extension, Path, State},
    Json,
};
use reclaim_core::services::settings_service::SettingsService;
use reclaim_core::{AppState, Claims};
use reclaim_primitives::error::{ApiError, ApiErrorResponse};
use reclaim_primitives::models::setting_dto::{SettingEntry, SettingsResponse, UpdateSettingRequest};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses((status = 200, description = "Effective settings, defaults included", body = SettingsResponse)),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn list_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SettingsResponse>, ApiError> {
    Ok(Json(SettingsService::list(&state).await?))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings/{key}",
    params(("key" = String, Path, description = "Setting key, e.g. grams_per_unit")),
    request_body = UpdateSettingRequest,
    responses(
        (status = 200, description = "Setting stored", body = SettingEntry),
        (status = 400, description = "Unknown key or invalid value", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn update_setting(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateSettingRequest>,
) -> Result<Json<SettingEntry>, ApiError> {
    payload.validate()?;
    let entry = SettingsService::update(&state, claims.user_id()?, &key, &payload.value).await?;
    Ok(Json(entry))
}
