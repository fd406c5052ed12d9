use crate::app_state::AppState;
use crate::repositories::merchant_repository::MerchantRepository;
use crate::repositories::partner_repository::PartnerRepository;
use crate::security::SecurityConfig;
use crate::services::audit_service::AuditService;
use diesel::prelude::*;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::merchant::{MerchantChangeset, NewMerchant};
use reclaim_primitives::models::merchant_dto::{
    CreateMerchantRequest, MerchantKeyResponse, MerchantResponse, MerchantsResponse,
    UpdateMerchantRequest,
};
use reclaim_primitives::utility::normalize_email;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct MerchantService;

impl MerchantService {
    fn ensure_partner(conn: &mut PgConnection, partner_id: Option<Uuid>) -> Result<(), ApiError> {
        if let Some(id) = partner_id {
            PartnerRepository::find_by_id(conn, id)?
                .ok_or_else(|| ApiError::BadRequest("Partner does not exist".into()))?;
        }
        Ok(())
    }

    /// The plain key is returned once and only its hash is stored.
    pub async fn create(
        state: &AppState,
        admin_id: Uuid,
        req: CreateMerchantRequest,
    ) -> Result<MerchantKeyResponse, ApiError> {
        req.validate()?;

        let api_key = SecurityConfig::generate_api_key();
        let key_hash = SecurityConfig::hash_secret(&api_key);
        let contact_email = req.contact_email.as_deref().map(normalize_email);
        let mut conn = state.db.get()?;

        let merchant = conn.transaction::<_, ApiError, _>(|conn| {
            Self::ensure_partner(conn, req.partner_id)?;
            MerchantRepository::create(
                conn,
                NewMerchant {
                    name: req.name.trim(),
                    contact_email: contact_email.as_deref(),
                    partner_id: req.partner_id,
                    multiplier_bps: req.multiplier_bps,
                    billing_enabled: req.billing_enabled,
                    api_key_hash: Some(&key_hash),
                },
            )
        })?;

        AuditService::log_event(
            state,
            Some(admin_id),
            "merchant.create",
            Some("merchant"),
            Some(&merchant.id.to_string()),
            serde_json::json!({ "name": merchant.name, "partner_id": merchant.partner_id }),
        )
        .await;

        info!(merchant_id = %merchant.id, name = %merchant.name, "Merchant created");

        Ok(MerchantKeyResponse {
            merchant: merchant.into(),
            api_key,
        })
    }

    pub async fn list(state: &AppState) -> Result<MerchantsResponse, ApiError> {
        let mut conn = state.db.get()?;
        let merchants = MerchantRepository::list(&mut conn)?;

        Ok(MerchantsResponse {
            merchants: merchants.into_iter().map(MerchantResponse::from).collect(),
        })
    }

    pub async fn get(state: &AppState, merchant_id: Uuid) -> Result<MerchantResponse, ApiError> {
        let mut conn = state.db.get()?;
        MerchantRepository::find_by_id(&mut conn, merchant_id)?
            .map(MerchantResponse::from)
            .ok_or_else(|| ApiError::NotFound("Merchant not found".into()))
    }

    pub fn changeset(req: &UpdateMerchantRequest) -> Result<MerchantChangeset, ApiError> {
        if req.clear_partner && req.partner_id.is_some() {
            return Err(ApiError::BadRequest(
                "partner_id and clear_partner are mutually exclusive".into(),
            ));
        }
        if req.clear_multiplier && req.multiplier_bps.is_some() {
            return Err(ApiError::BadRequest(
                "multiplier_bps and clear_multiplier are mutually exclusive".into(),
            ));
        }

        Ok(MerchantChangeset {
            name: req.name.as_ref().map(|n| n.trim().to_string()),
            contact_email: req.contact_email.as_deref().map(|e| Some(normalize_email(e))),
            partner_id: if req.clear_partner {
                Some(None)
            } else {
                req.partner_id.map(Some)
            },
            multiplier_bps: if req.clear_multiplier {
                Some(None)
            } else {
                req.multiplier_bps.map(Some)
            },
            billing_enabled: req.billing_enabled,
            is_active: req.is_active,
        })
    }

    pub async fn update(
        state: &AppState,
        admin_id: Uuid,
        merchant_id: Uuid,
        req: UpdateMerchantRequest,
    ) -> Result<MerchantResponse, ApiError> {
        req.validate()?;
        let changes = Self::changeset(&req)?;
        let mut conn = state.db.get()?;

        let merchant = conn.transaction::<_, ApiError, _>(|conn| {
            MerchantRepository::find_by_id_for_update(conn, merchant_id)?
                .ok_or_else(|| ApiError::NotFound("Merchant not found".into()))?;
            Self::ensure_partner(conn, req.partner_id)?;

            if changes == MerchantChangeset::default() {
                return MerchantRepository::find_by_id(conn, merchant_id)?
                    .ok_or_else(|| ApiError::NotFound("Merchant not found".into()));
            }
            MerchantRepository::update(conn, merchant_id, &changes)
        })?;

        AuditService::log_event(
            state,
            Some(admin_id),
            "merchant.update",
            Some("merchant"),
            Some(&merchant.id.to_string()),
            serde_json::json!({
                "is_active": merchant.is_active,
                "billing_enabled": merchant.billing_enabled,
                "multiplier_bps": merchant.multiplier_bps,
            }),
        )
        .await;

        Ok(merchant.into())
    }

    pub async fn rotate_key(
        state: &AppState,
        admin_id: Uuid,
        merchant_id: Uuid,
    ) -> Result<MerchantKeyResponse, ApiError> {
        let api_key = SecurityConfig::generate_api_key();
        let key_hash = SecurityConfig::hash_secret(&api_key);
        let mut conn = state.db.get()?;

        MerchantRepository::find_by_id(&mut conn, merchant_id)?
            .ok_or_else(|| ApiError::NotFound("Merchant not found".into()))?;
        let merchant = MerchantRepository::set_api_key_hash(&mut conn, merchant_id, &key_hash)?;

        AuditService::log_event(
            state,
            Some(admin_id),
            "merchant.rotate_key",
            Some("merchant"),
            Some(&merchant.id.to_string()),
            serde_json::json!({}),
        )
        .await;

        info!(merchant_id = %merchant.id, "Merchant API key rotated");

        Ok(MerchantKeyResponse {
            merchant: merchant.into(),
            api_key,
        })
    }
}
