use crate::app_state::AppState;
use crate::repositories::transaction_repository::TransactionRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::calculation_service::CalculationService;
use crate::services::settings_service::{ImpactSettings, SettingsService};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::cron_dto::MaturationReport;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaturationStep {
    pub delta: i64,
    pub stage_changed: bool,
    pub certified: bool,
}

pub struct MaturationService;

impl MaturationService {
    /// Recomputes one transaction's matured impact. Matured grams only grow.
    pub fn advance(
        conn: &mut PgConnection,
        transaction_id: Uuid,
        settings: &ImpactSettings,
        now: DateTime<Utc>,
    ) -> Result<MaturationStep, ApiError> {
        let tx = TransactionRepository::find_by_id_for_update(conn, transaction_id)?
            .ok_or_else(|| ApiError::NotFound("Transaction not found".into()))?;

        if !tx.payment_status.is_live() {
            return Ok(MaturationStep::default());
        }

        let breakdown = CalculationService::maturation_breakdown(
            tx.impact,
            tx.created_at,
            tx.is_paid(),
            now,
            &settings.schedule(),
        )?;

        let matured = breakdown.matured.max(tx.matured_impact);
        let stage = breakdown.stage.max(tx.maturation_stage);
        let delta = matured - tx.matured_impact;

        TransactionRepository::update_maturation(
            conn,
            tx.id,
            matured,
            stage,
            breakdown.next_maturation_at,
        )?;

        if delta > 0 {
            UserRepository::add_matured_impact(conn, tx.user_id, delta)?;
        }

        let certified = UserRepository::certify_if_eligible(
            conn,
            tx.user_id,
            settings.certification_threshold_grams,
            now,
        )?;

        Ok(MaturationStep {
            delta,
            stage_changed: stage != tx.maturation_stage,
            certified,
        })
    }

    pub async fn run_daily(state: &AppState, now: DateTime<Utc>) -> Result<MaturationReport, ApiError> {
        let mut conn = state.db.get()?;
        let settings = SettingsService::load(&mut conn)?;
        let due = TransactionRepository::find_due_for_maturation(&mut conn, now)?;

        let mut report = MaturationReport {
            examined: due.len(),
            ..Default::default()
        };

        for id in due {
            let result = conn
                .transaction::<_, ApiError, _>(|conn| Self::advance(conn, id, &settings, now));

            match result {
                Ok(step) => {
                    if step.delta > 0 || step.stage_changed {
                        report.advanced += 1;
                    }
                    report.grams_matured += step.delta;
                    if step.certified {
                        report.users_certified += 1;
                    }
                }
                Err(e) => {
                    error!(transaction_id = %id, error = %e, "Maturation failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            examined = report.examined,
            advanced = report.advanced,
            failed = report.failed,
            grams = report.grams_matured,
            certified = report.users_certified,
            "Daily maturation finished"
        );

        Ok(report)
    }
}
