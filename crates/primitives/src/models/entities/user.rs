use crate::models::entities::enum_types::{CertificationStatus, UserRole};
use chrono::{DateTime, Utc};
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub total_contributed: i64,
    pub total_impact: i64,
    pub matured_impact: i64,
    pub certification_status: CertificationStatus,
    pub certified_at: Option<DateTime<Utc>>,
    pub corsair_exported_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn pending_impact(&self) -> i64 {
        self.total_impact - self.matured_impact
    }

    pub fn is_certified(&self) -> bool {
        self.certification_status == CertificationStatus::Certified
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub name: Option<&'a str>,
    pub role: UserRole,
}
