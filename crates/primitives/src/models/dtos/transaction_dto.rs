use crate::models::entities::enum_types::{PaymentMode, PaymentStatus};
use crate::models::entities::transaction::Transaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct RecordContributionRequest {
    #[validate(email)]
    pub user_email: String,

    #[validate(length(min = 1, max = 120))]
    pub user_name: Option<String>,

    /// Minor currency units
    #[validate(range(min = 1, max = 100_000_000))]
    pub amount: i64,

    pub merchant_id: Option<Uuid>,

    /// Explicit multiplier, overrides merchant and global defaults
    #[validate(range(min = 1, max = 1_000_000))]
    pub multiplier_bps: Option<i32>,

    /// `direct` (default) or `merchant`; gift codes go through redemption
    pub payment_mode: Option<PaymentMode>,

    #[validate(length(min = 8, max = 128))]
    pub idempotency_key: String,

    #[validate(length(max = 255))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct MerchantContributionRequest {
    #[validate(email)]
    pub customer_email: String,

    #[validate(length(min = 1, max = 120))]
    pub customer_name: Option<String>,

    #[validate(range(min = 1, max = 100_000_000))]
    pub amount: i64,

    #[validate(length(min = 8, max = 128))]
    pub idempotency_key: String,

    #[validate(length(max = 255))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub merchant_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
    pub invoice_id: Option<Uuid>,
    pub amount: i64,
    pub impact: i64,
    pub multiplier_bps: i32,
    pub payment_mode: PaymentMode,
    pub payment_status: PaymentStatus,
    pub matured_impact: i64,
    pub maturation_stage: i16,
    pub next_maturation_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            user_id: tx.user_id,
            merchant_id: tx.merchant_id,
            partner_id: tx.partner_id,
            invoice_id: tx.invoice_id,
            amount: tx.amount,
            impact: tx.impact,
            multiplier_bps: tx.multiplier_bps,
            payment_mode: tx.payment_mode,
            payment_status: tx.payment_status,
            matured_impact: tx.matured_impact,
            maturation_stage: tx.maturation_stage,
            next_maturation_at: tx.next_maturation_at,
            description: tx.description,
            created_at: tx.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionResponse>,
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TransactionFilter {
    pub user_id: Option<Uuid>,
    pub merchant_id: Option<Uuid>,
    /// `pending`, `paid` or `failed`
    pub status: Option<String>,
}
