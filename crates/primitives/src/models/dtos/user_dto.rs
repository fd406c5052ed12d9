use crate::models::dtos::impact_dto::MaturationBreakdown;
use crate::models::entities::enum_types::{CertificationStatus, UserRole};
use crate::models::entities::user::User;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummaryDto {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
    /// Minor currency units
    pub total_contributed: i64,
    /// Grams of plastic
    pub total_impact: i64,
    pub matured_impact: i64,
    pub pending_impact: i64,
    pub certification_status: CertificationStatus,
    pub certified_at: Option<DateTime<Utc>>,
    pub corsair_exported_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserSummaryDto {
    fn from(user: User) -> Self {
        Self {
            pending_impact: user.pending_impact(),
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            total_contributed: user.total_contributed,
            total_impact: user.total_impact,
            matured_impact: user.matured_impact,
            certification_status: user.certification_status,
            certified_at: user.certified_at,
            corsair_exported_at: user.corsair_exported_at,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<UserSummaryDto>,
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserImpactResponse {
    pub total_impact: i64,
    pub matured_impact: i64,
    pub pending_impact: i64,
    pub certification_status: CertificationStatus,
    pub certification_threshold: i64,
    /// Grams still needed to reach certification; 0 once certified
    pub remaining_to_certification: i64,
    pub next_maturation_at: Option<DateTime<Utc>>,
    pub breakdowns: Vec<TransactionMaturityDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionMaturityDto {
    pub transaction_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub breakdown: MaturationBreakdown,
}
