use crate::app_state::AppState;
use crate::repositories::transaction_repository::TransactionRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::calculation_service::CalculationService;
use crate::services::settings_service::SettingsService;
use chrono::Utc;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::user::User;
use reclaim_primitives::models::pagination::PageQuery;
use reclaim_primitives::models::user_dto::{
    TransactionMaturityDto, UserImpactResponse, UserSummaryDto, UsersResponse,
};
use uuid::Uuid;

pub struct UserService;

impl UserService {
    fn load(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
        let mut conn = state.db.get()?;
        UserRepository::find_by_id(&mut conn, user_id)?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))
    }

    pub async fn me(state: &AppState, user_id: Uuid) -> Result<UserSummaryDto, ApiError> {
        Self::load(state, user_id).map(UserSummaryDto::from)
    }

    /// Ledger totals plus a per-transaction vesting projection as of now.
    pub async fn impact(state: &AppState, user_id: Uuid) -> Result<UserImpactResponse, ApiError> {
        let mut conn = state.db.get()?;
        let user = UserRepository::find_by_id(&mut conn, user_id)?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
        let settings = SettingsService::load(&mut conn)?;
        let transactions = TransactionRepository::list_live_by_user(&mut conn, user_id)?;

        let now = Utc::now();
        let schedule = settings.schedule();

        let breakdowns: Vec<TransactionMaturityDto> = transactions
            .iter()
            .map(|tx| {
                Ok(TransactionMaturityDto {
                    transaction_id: tx.id,
                    created_at: tx.created_at,
                    breakdown: CalculationService::maturation_breakdown(
                        tx.impact,
                        tx.created_at,
                        tx.is_paid(),
                        now,
                        &schedule,
                    )?,
                })
            })
            .collect::<Result<_, ApiError>>()?;

        let next_maturation_at = breakdowns
            .iter()
            .filter_map(|b| b.breakdown.next_maturation_at)
            .min();

        let remaining_to_certification = if user.is_certified() {
            0
        } else {
            (settings.certification_threshold_grams - user.matured_impact).max(0)
        };

        Ok(UserImpactResponse {
            total_impact: user.total_impact,
            matured_impact: user.matured_impact,
            pending_impact: user.pending_impact(),
            certification_status: user.certification_status,
            certification_threshold: settings.certification_threshold_grams,
            remaining_to_certification,
            next_maturation_at,
            breakdowns,
        })
    }

    pub async fn list(state: &AppState, page: PageQuery) -> Result<UsersResponse, ApiError> {
        let (limit, offset) = page.limit_offset();
        let mut conn = state.db.get()?;
        let users = UserRepository::list(&mut conn, limit, offset)?;

        Ok(UsersResponse {
            users: users.into_iter().map(UserSummaryDto::from).collect(),
            page: page.page(),
            per_page: limit,
        })
    }

    pub async fn get(state: &AppState, user_id: Uuid) -> Result<UserSummaryDto, ApiError> {
        Self::load(state, user_id).map(UserSummaryDto::from)
    }
}
