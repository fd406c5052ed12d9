use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CronRequest {
    /// Defaults to the current time
    pub reference_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, Serialize, ToSchema)]
pub struct MaturationReport {
    pub examined: usize,
    pub advanced: usize,
    pub failed: usize,
    pub grams_matured: i64,
    pub users_certified: usize,
}

#[derive(Debug, Default, Clone, Serialize, ToSchema)]
pub struct BillingReport {
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub merchants_examined: usize,
    pub invoices_created: usize,
    pub merchants_skipped: usize,
    pub failed: usize,
    pub amount_invoiced: i64,
    pub invoice_ids: Vec<Uuid>,
}

#[derive(Debug, Default, Clone, Serialize, ToSchema)]
pub struct ExportReport {
    pub users_exported: usize,
    /// `corsair_api` or the file written
    pub destination: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyCronResponse {
    pub ran_at: DateTime<Utc>,
    pub maturation: MaturationReport,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MonthlyCronResponse {
    pub ran_at: DateTime<Utc>,
    pub billing: BillingReport,
    pub export: Option<ExportReport>,
    /// Present when the export step failed after billing succeeded
    pub export_error: Option<String>,
}
