use crate::models::entities::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// One certified user as delivered to Corsair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CorsairRecord {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub certified_at: Option<DateTime<Utc>>,
    pub total_impact_grams: i64,
    pub matured_impact_grams: i64,
    pub total_contributed: i64,
    pub currency: String,
}

impl CorsairRecord {
    pub fn from_user(user: &User, currency: &str) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            certified_at: user.certified_at,
            total_impact_grams: user.total_impact,
            matured_impact_grams: user.matured_impact,
            total_contributed: user.total_contributed,
            currency: currency.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CorsairBatch {
    pub generated_at: DateTime<Utc>,
    pub records: Vec<CorsairRecord>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ExportQuery {
    /// `csv` (default) or `json`
    pub format: Option<String>,
    /// Include users that were already exported
    #[serde(default)]
    pub include_exported: bool,
    /// Stamp exported users so the next batch skips them
    #[serde(default)]
    pub mark: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ExportFormatQuery {
    /// `csv` (default) or `json`
    pub format: Option<String>,
}
