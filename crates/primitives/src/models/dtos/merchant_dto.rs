use crate::models::entities::merchant::Merchant;
use crate::models::entities::partner::Partner;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateMerchantRequest {
    #[validate(length(min = 2, max = 120))]
    pub name: String,

    #[validate(email)]
    pub contact_email: Option<String>,

    pub partner_id: Option<Uuid>,

    #[validate(range(min = 1, max = 1_000_000))]
    pub multiplier_bps: Option<i32>,

    #[serde(default = "default_billing_enabled")]
    pub billing_enabled: bool,
}

fn default_billing_enabled() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateMerchantRequest {
    #[validate(length(min = 2, max = 120))]
    pub name: Option<String>,

    #[validate(email)]
    pub contact_email: Option<String>,

    pub partner_id: Option<Uuid>,

    /// Detach the merchant from its partner
    #[serde(default)]
    pub clear_partner: bool,

    #[validate(range(min = 1, max = 1_000_000))]
    pub multiplier_bps: Option<i32>,

    /// Fall back to the global default multiplier
    #[serde(default)]
    pub clear_multiplier: bool,

    pub billing_enabled: Option<bool>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MerchantResponse {
    pub id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub partner_id: Option<Uuid>,
    pub multiplier_bps: Option<i32>,
    pub balance: i64,
    pub billing_enabled: bool,
    pub has_api_key: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Merchant> for MerchantResponse {
    fn from(m: Merchant) -> Self {
        Self {
            id: m.id,
            name: m.name,
            contact_email: m.contact_email,
            partner_id: m.partner_id,
            multiplier_bps: m.multiplier_bps,
            balance: m.balance,
            billing_enabled: m.billing_enabled,
            has_api_key: m.api_key_hash.is_some(),
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}

/// The plain API key is only ever returned here.
#[derive(Debug, Serialize, ToSchema)]
pub struct MerchantKeyResponse {
    pub merchant: MerchantResponse,
    pub api_key: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MerchantsResponse {
    pub merchants: Vec<MerchantResponse>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePartnerRequest {
    #[validate(length(min = 2, max = 120))]
    pub name: String,

    #[validate(email)]
    pub contact_email: Option<String>,

    #[validate(range(min = 0, max = 10_000))]
    #[serde(default)]
    pub commission_bps: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdatePartnerRequest {
    #[validate(length(min = 2, max = 120))]
    pub name: Option<String>,

    #[validate(email)]
    pub contact_email: Option<String>,

    #[validate(range(min = 0, max = 10_000))]
    pub commission_bps: Option<i32>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PartnerResponse {
    pub id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub commission_bps: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Partner> for PartnerResponse {
    fn from(p: Partner) -> Self {
        Self {
            id: p.id,
            name: p.name,
            contact_email: p.contact_email,
            commission_bps: p.commission_bps,
            is_active: p.is_active,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PartnersResponse {
    pub partners: Vec<PartnerResponse>,
}
