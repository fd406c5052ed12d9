use crate::models::entities::enum_types::{PaymentMode, PaymentStatus};
use chrono::{DateTime, Utc};
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(belongs_to(crate::models::entities::user::User))]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub merchant_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
    pub gift_code_id: Option<Uuid>,
    pub invoice_id: Option<Uuid>,

    pub amount: i64,
    pub impact: i64,
    pub multiplier_bps: i32,

    pub payment_mode: PaymentMode,
    pub payment_status: PaymentStatus,

    pub matured_impact: i64,
    pub maturation_stage: i16,
    pub next_maturation_at: Option<DateTime<Utc>>,

    pub idempotency_key: String,
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransaction<'a> {
    pub user_id: Uuid,
    pub merchant_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
    pub gift_code_id: Option<Uuid>,
    pub amount: i64,
    pub impact: i64,
    pub multiplier_bps: i32,
    pub payment_mode: PaymentMode,
    pub payment_status: PaymentStatus,
    pub matured_impact: i64,
    pub maturation_stage: i16,
    pub next_maturation_at: Option<DateTime<Utc>>,
    pub idempotency_key: &'a str,
    pub description: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}
