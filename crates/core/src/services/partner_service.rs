use crate::app_state::AppState;
use crate::repositories::partner_repository::PartnerRepository;
use crate::services::audit_service::AuditService;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::partner::{NewPartner, PartnerChangeset};
use reclaim_primitives::models::merchant_dto::{
    CreatePartnerRequest, PartnerResponse, PartnersResponse, UpdatePartnerRequest,
};
use reclaim_primitives::utility::normalize_email;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct PartnerService;

impl PartnerService {
    pub async fn create(
        state: &AppState,
        admin_id: Uuid,
        req: CreatePartnerRequest,
    ) -> Result<PartnerResponse, ApiError> {
        req.validate()?;

        let contact_email = req.contact_email.as_deref().map(normalize_email);
        let mut conn = state.db.get()?;
        let partner = PartnerRepository::create(
            &mut conn,
            NewPartner {
                name: req.name.trim(),
                contact_email: contact_email.as_deref(),
                commission_bps: req.commission_bps,
            },
        )?;

        AuditService::log_event(
            state,
            Some(admin_id),
            "partner.create",
            Some("partner"),
            Some(&partner.id.to_string()),
            serde_json::json!({ "name": partner.name, "commission_bps": partner.commission_bps }),
        )
        .await;

        info!(partner_id = %partner.id, name = %partner.name, "Partner created");
        Ok(partner.into())
    }

    pub async fn list(state: &AppState) -> Result<PartnersResponse, ApiError> {
        let mut conn = state.db.get()?;
        let partners = PartnerRepository::list(&mut conn)?;

        Ok(PartnersResponse {
            partners: partners.into_iter().map(PartnerResponse::from).collect(),
        })
    }

    pub async fn get(state: &AppState, partner_id: Uuid) -> Result<PartnerResponse, ApiError> {
        let mut conn = state.db.get()?;
        PartnerRepository::find_by_id(&mut conn, partner_id)?
            .map(PartnerResponse::from)
            .ok_or_else(|| ApiError::NotFound("Partner not found".into()))
    }

    pub async fn update(
        state: &AppState,
        admin_id: Uuid,
        partner_id: Uuid,
        req: UpdatePartnerRequest,
    ) -> Result<PartnerResponse, ApiError> {
        req.validate()?;

        let changes = PartnerChangeset {
            name: req.name.map(|n| n.trim().to_string()),
            contact_email: req.contact_email.as_deref().map(normalize_email),
            commission_bps: req.commission_bps,
            is_active: req.is_active,
        };

        let mut conn = state.db.get()?;
        let existing = PartnerRepository::find_by_id(&mut conn, partner_id)?
            .ok_or_else(|| ApiError::NotFound("Partner not found".into()))?;

        let partner = if changes == PartnerChangeset::default() {
            existing
        } else {
            PartnerRepository::update(&mut conn, partner_id, &changes)?
        };

        AuditService::log_event(
            state,
            Some(admin_id),
            "partner.update",
            Some("partner"),
            Some(&partner.id.to_string()),
            serde_json::json!({ "commission_bps": partner.commission_bps, "is_active": partner.is_active }),
        )
        .await;

        Ok(partner.into())
    }
}
