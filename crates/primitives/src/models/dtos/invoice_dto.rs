use crate::models::entities::invoice::Invoice;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub partner_id: Option<Uuid>,
    pub period_start: NaiveDate,
    /// Exclusive
    pub period_end: NaiveDate,
    pub amount: i64,
    pub commission_amount: i64,
    pub transaction_count: i32,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(inv: Invoice) -> Self {
        Self {
            id: inv.id,
            merchant_id: inv.merchant_id,
            partner_id: inv.partner_id,
            period_start: inv.period_start,
            period_end: inv.period_end,
            amount: inv.amount,
            commission_amount: inv.commission_amount,
            transaction_count: inv.transaction_count,
            paid: inv.paid,
            paid_at: inv.paid_at,
            created_at: inv.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoicesResponse {
    pub invoices: Vec<InvoiceResponse>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct InvoiceFilter {
    pub merchant_id: Option<Uuid>,
    pub paid: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoicePaidResponse {
    pub invoice: InvoiceResponse,
    pub transactions_reconciled: usize,
}
