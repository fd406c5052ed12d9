use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
    /// True when no row exists and the built-in default applies
    pub is_default: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsResponse {
    pub settings: Vec<SettingEntry>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateSettingRequest {
    #[validate(length(min = 1, max = 64))]
    pub value: String,
}
