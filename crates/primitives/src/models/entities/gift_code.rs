use crate::models::entities::enum_types::GiftCodeStatus;
use chrono::{DateTime, Utc};
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = crate::schema::gift_codes)]
pub struct GiftCode {
    pub id: Uuid,
    pub code: String,
    pub amount: i64,
    pub status: GiftCodeStatus,
    pub redeemed_by: Option<Uuid>,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl GiftCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::gift_codes)]
pub struct NewGiftCode {
    pub code: String,
    pub amount: i64,
    pub expires_at: Option<DateTime<Utc>>,
}
