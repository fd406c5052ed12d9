use crate::models::dtos::transaction_dto::TransactionResponse;
use crate::models::entities::enum_types::GiftCodeStatus;
use crate::models::entities::gift_code::GiftCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateGiftCodesRequest {
    #[validate(range(min = 1, max = 500))]
    pub count: u32,

    /// Minor currency units credited on redemption
    #[validate(range(min = 1, max = 100_000_000))]
    pub amount: i64,

    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RedeemGiftCodeRequest {
    #[schema(example = "RCLM-7Q2K-M9XD-4HPA")]
    #[validate(length(min = 4, max = 64))]
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GiftCodeResponse {
    pub id: Uuid,
    pub code: String,
    pub amount: i64,
    pub status: GiftCodeStatus,
    pub redeemed_by: Option<Uuid>,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<GiftCode> for GiftCodeResponse {
    fn from(g: GiftCode) -> Self {
        Self {
            id: g.id,
            code: g.code,
            amount: g.amount,
            status: g.status,
            redeemed_by: g.redeemed_by,
            redeemed_at: g.redeemed_at,
            expires_at: g.expires_at,
            created_at: g.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GiftCodesResponse {
    pub gift_codes: Vec<GiftCodeResponse>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct GiftCodeFilter {
    /// `unused`, `used` or `deactivated`
    pub status: Option<GiftCodeStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RedeemGiftCodeResponse {
    pub gift_code: GiftCodeResponse,
    pub transaction: TransactionResponse,
}
