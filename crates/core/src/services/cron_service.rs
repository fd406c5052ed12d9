use crate::app_state::AppState;
use crate::services::audit_service::AuditService;
use crate::services::billing_service::BillingService;
use crate::services::corsair_service::CorsairService;
use crate::services::maturation_service::MaturationService;
use chrono::{DateTime, Utc};
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::cron_dto::{DailyCronResponse, MonthlyCronResponse};
use tracing::{error, info};
use uuid::Uuid;

pub struct CronService;

impl CronService {
    pub async fn run_daily(
        state: &AppState,
        triggered_by: Option<Uuid>,
        reference: Option<DateTime<Utc>>,
    ) -> Result<DailyCronResponse, ApiError> {
        let ran_at = reference.unwrap_or_else(Utc::now);
        info!(reference = %ran_at, "Daily cron started");

        let maturation = MaturationService::run_daily(state, ran_at).await?;

        AuditService::log_event(
            state,
            triggered_by,
            "cron.daily",
            None,
            None,
            serde_json::json!({
                "reference": ran_at,
                "advanced": maturation.advanced,
                "failed": maturation.failed,
            }),
        )
        .await;

        Ok(DailyCronResponse { ran_at, maturation })
    }

    /// Billing first; an export failure is reported, not raised, so the
    /// invoices created in this run are never hidden behind an error.
    pub async fn run_monthly(
        state: &AppState,
        triggered_by: Option<Uuid>,
        reference: Option<DateTime<Utc>>,
    ) -> Result<MonthlyCronResponse, ApiError> {
        let ran_at = reference.unwrap_or_else(Utc::now);
        info!(reference = %ran_at, "Monthly cron started");

        let billing = BillingService::run_monthly(state, ran_at).await?;

        let (export, export_error) = match CorsairService::push_batch(state, ran_at).await {
            Ok(report) => (Some(report), None),
            Err(e) => {
                error!(error = %e, "Corsair export failed");
                (None, Some(e.to_string()))
            }
        };

        AuditService::log_event(
            state,
            triggered_by,
            "cron.monthly",
            None,
            None,
            serde_json::json!({
                "reference": ran_at,
                "invoices": billing.invoices_created,
                "exported": export.as_ref().map(|e| e.users_exported),
                "export_error": export_error,
            }),
        )
        .await;

        Ok(MonthlyCronResponse {
            ran_at,
            billing,
            export,
            export_error,
        })
    }
}
