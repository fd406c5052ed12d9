use crate::app_state::AppState;
use crate::repositories::gift_code_repository::GiftCodeRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::audit_service::AuditService;
use crate::services::contribution_service::{ContributionInput, ContributionService};
use crate::services::settings_service::SettingsService;
use chrono::Utc;
use diesel::prelude::*;
use rand::rngs::OsRng;
use rand::Rng;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::enum_types::{GiftCodeStatus, PaymentMode};
use reclaim_primitives::models::entities::gift_code::NewGiftCode;
use reclaim_primitives::models::gift_code_dto::{
    CreateGiftCodesRequest, GiftCodeFilter, GiftCodeResponse, GiftCodesResponse,
    RedeemGiftCodeRequest, RedeemGiftCodeResponse,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

// no 0/O or 1/I
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_PREFIX: &str = "RCLM";

pub struct GiftCodeService;

impl GiftCodeService {
    /// `RCLM-XXXX-XXXX-XXXX`
    pub fn generate_code() -> String {
        let mut rng = OsRng;
        let groups: Vec<String> = (0..3)
            .map(|_| {
                (0..4)
                    .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
                    .collect()
            })
            .collect();
        format!("{}-{}", CODE_PREFIX, groups.join("-"))
    }

    pub fn normalize_code(raw: &str) -> String {
        raw.trim().to_uppercase()
    }

    pub async fn create(
        state: &AppState,
        admin_id: Uuid,
        req: CreateGiftCodesRequest,
    ) -> Result<GiftCodesResponse, ApiError> {
        req.validate()?;

        if req.expires_at.is_some_and(|at| at <= Utc::now()) {
            return Err(ApiError::BadRequest("expires_at must be in the future".into()));
        }

        let batch: Vec<NewGiftCode> = (0..req.count)
            .map(|_| NewGiftCode {
                code: Self::generate_code(),
                amount: req.amount,
                expires_at: req.expires_at,
            })
            .collect();

        let mut conn = state.db.get()?;
        let created = GiftCodeRepository::create_many(&mut conn, &batch)?;

        AuditService::log_event(
            state,
            Some(admin_id),
            "gift_code.create",
            Some("gift_code"),
            None,
            serde_json::json!({ "count": created.len(), "amount": req.amount }),
        )
        .await;

        info!(count = created.len(), amount = req.amount, "Gift codes created");

        Ok(GiftCodesResponse {
            gift_codes: created.into_iter().map(GiftCodeResponse::from).collect(),
        })
    }

    pub async fn list(
        state: &AppState,
        filter: GiftCodeFilter,
    ) -> Result<GiftCodesResponse, ApiError> {
        let mut conn = state.db.get()?;
        let codes = GiftCodeRepository::list(&mut conn, filter.status)?;

        Ok(GiftCodesResponse {
            gift_codes: codes.into_iter().map(GiftCodeResponse::from).collect(),
        })
    }

    pub async fn deactivate(
        state: &AppState,
        admin_id: Uuid,
        gift_code_id: Uuid,
    ) -> Result<GiftCodeResponse, ApiError> {
        let mut conn = state.db.get()?;

        let code = conn.transaction::<_, ApiError, _>(|conn| {
            let code = GiftCodeRepository::find_by_id_for_update(conn, gift_code_id)?
                .ok_or_else(|| ApiError::NotFound("Gift code not found".into()))?;

            if !code.status.can_transition_to(GiftCodeStatus::Deactivated) {
                return Err(ApiError::Conflict(format!(
                    "Gift code is {} and cannot be deactivated",
                    code.status
                )));
            }

            GiftCodeRepository::deactivate(conn, code.id)
        })?;

        AuditService::log_event(
            state,
            Some(admin_id),
            "gift_code.deactivate",
            Some("gift_code"),
            Some(&code.id.to_string()),
            serde_json::json!({}),
        )
        .await;

        Ok(code.into())
    }

    pub async fn redeem(
        state: &AppState,
        user_id: Uuid,
        req: RedeemGiftCodeRequest,
    ) -> Result<RedeemGiftCodeResponse, ApiError> {
        req.validate()?;

        let code_value = Self::normalize_code(&req.code);
        let now = Utc::now();
        let mut conn = state.db.get()?;

        let (code, outcome) = conn.transaction::<_, ApiError, _>(|conn| {
            let code = GiftCodeRepository::find_by_code_for_update(conn, &code_value)?
                .ok_or_else(|| ApiError::NotFound("Gift code not found".into()))?;

            if !code.status.can_transition_to(GiftCodeStatus::Used) {
                return Err(ApiError::Conflict(format!("Gift code is {}", code.status)));
            }
            if code.is_expired(now) {
                return Err(ApiError::Conflict("Gift code has expired".into()));
            }

            let user = UserRepository::find_by_id(conn, user_id)?
                .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
            let settings = SettingsService::load(conn)?;
            let idempotency_key = format!("gift:{}", code.id);

            let outcome = ContributionService::apply(
                conn,
                &settings,
                ContributionInput {
                    user: &user,
                    amount: code.amount,
                    merchant: None,
                    multiplier_override: None,
                    payment_mode: PaymentMode::GiftCode,
                    gift_code_id: Some(code.id),
                    idempotency_key: &idempotency_key,
                    description: Some("Gift code redemption"),
                },
                now,
            )?;

            let code = GiftCodeRepository::mark_used(conn, code.id, user.id, now)?;
            Ok((code, outcome))
        })?;

        info!(
            gift_code_id = %code.id,
            user_id = %user_id,
            impact = outcome.transaction.impact,
            "Gift code redeemed"
        );

        Ok(RedeemGiftCodeResponse {
            gift_code: code.into(),
            transaction: outcome.transaction.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_grouped_and_unambiguous() {
        let code = GiftCodeService::generate_code();
        assert_eq!(code.len(), "RCLM-XXXX-XXXX-XXXX".len());
        assert!(code.starts_with("RCLM-"));
        for group in code.split('-').skip(1) {
            assert_eq!(group.len(), 4);
            assert!(group.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
        assert_ne!(code, GiftCodeService::generate_code());
    }

    #[test]
    fn normalizes_user_input() {
        assert_eq!(
            GiftCodeService::normalize_code("  rclm-abcd-efgh-jkmn "),
            "RCLM-ABCD-EFGH-JKMN"
        );
    }
}
