use chrono::{DateTime, NaiveDate, Utc};
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::invoices)]
#[diesel(belongs_to(crate::models::entities::merchant::Merchant))]
pub struct Invoice {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub partner_id: Option<Uuid>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub amount: i64,
    pub commission_amount: i64,
    pub transaction_count: i32,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::invoices)]
pub struct NewInvoice {
    pub merchant_id: Uuid,
    pub partner_id: Option<Uuid>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub amount: i64,
    pub commission_amount: i64,
    pub transaction_count: i32,
}
