use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Split of one transaction's impact across the three vesting tranches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct MaturationBreakdown {
    /// 5 %, matures on confirmation
    pub instant: i64,
    /// 45 %, matures after the first stage delay
    pub first_stage: i64,
    /// Remaining 50 %, matures after the final stage delay once paid
    pub final_stage: i64,
    pub matured: i64,
    pub pending: i64,
    /// Number of tranches matured (0..=3)
    pub stage: i16,
    pub next_maturation_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct QuoteQuery {
    /// Minor currency units
    pub amount: i64,
    pub merchant_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    pub amount: i64,
    pub currency: String,
    pub impact: i64,
    pub multiplier_bps: i32,
    pub grams_per_unit: i64,
}
