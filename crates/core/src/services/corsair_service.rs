use crate::app_state::AppState;
use crate::repositories::user_repository::UserRepository;
use crate::services::audit_service::AuditService;
use chrono::{DateTime, Utc};
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::cron_dto::ExportReport;
use reclaim_primitives::models::entities::enum_types::ExportFormat;
use reclaim_primitives::models::entities::user::User;
use reclaim_primitives::models::export_dto::{CorsairBatch, CorsairRecord, ExportQuery};
use tracing::{info, warn};
use uuid::Uuid;

/// A rendered export ready to be sent as a download.
#[derive(Debug)]
pub struct ExportFile {
    pub filename: String,
    pub format: ExportFormat,
    pub body: Vec<u8>,
    pub records: usize,
}

pub struct CorsairService;

impl CorsairService {
    pub fn records(users: &[User], currency: &str) -> Vec<CorsairRecord> {
        users
            .iter()
            .filter(|u| u.is_certified())
            .map(|u| CorsairRecord::from_user(u, currency))
            .collect()
    }

    pub fn render(
        records: Vec<CorsairRecord>,
        format: ExportFormat,
        generated_at: DateTime<Utc>,
    ) -> Result<Vec<u8>, ApiError> {
        match format {
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                for record in &records {
                    writer.serialize(record)?;
                }
                writer
                    .into_inner()
                    .map_err(|e| ApiError::Export(e.to_string()))
            }
            ExportFormat::Json => Ok(serde_json::to_vec_pretty(&CorsairBatch {
                generated_at,
                records,
            })?),
        }
    }

    fn filename(prefix: &str, format: ExportFormat, at: DateTime<Utc>) -> String {
        format!(
            "{}-{}.{}",
            prefix,
            at.format("%Y%m%dT%H%M%SZ"),
            format.extension()
        )
    }

    pub async fn export_batch(
        state: &AppState,
        admin_id: Uuid,
        query: ExportQuery,
    ) -> Result<ExportFile, ApiError> {
        let format = query
            .format
            .as_deref()
            .map(ExportFormat::parse)
            .transpose()?
            .unwrap_or_default();
        let now = Utc::now();

        let mut conn = state.db.get()?;
        let users = UserRepository::list_certified(&mut conn, query.include_exported)?;
        let records = Self::records(&users, &state.config.currency);
        let count = records.len();
        let body = Self::render(records, format, now)?;

        if query.mark && !users.is_empty() {
            let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
            UserRepository::mark_exported(&mut conn, &ids, now)?;
        }

        AuditService::log_event(
            state,
            Some(admin_id),
            "corsair.export_batch",
            Some("user"),
            None,
            serde_json::json!({
                "records": count,
                "format": format.extension(),
                "marked": query.mark,
            }),
        )
        .await;

        info!(records = count, marked = query.mark, "Corsair batch exported");

        Ok(ExportFile {
            filename: Self::filename("corsair-export", format, now),
            format,
            body,
            records: count,
        })
    }

    pub async fn export_user(
        state: &AppState,
        admin_id: Uuid,
        user_id: Uuid,
        format: ExportFormat,
    ) -> Result<ExportFile, ApiError> {
        let mut conn = state.db.get()?;
        let user = UserRepository::find_by_id(&mut conn, user_id)?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

        if !user.is_certified() {
            return Err(ApiError::Conflict(
                "User is not certified and cannot be exported".into(),
            ));
        }

        let now = Utc::now();
        let records = Self::records(std::slice::from_ref(&user), &state.config.currency);
        let body = Self::render(records, format, now)?;

        AuditService::log_event(
            state,
            Some(admin_id),
            "corsair.export_user",
            Some("user"),
            Some(&user.id.to_string()),
            serde_json::json!({ "format": format.extension() }),
        )
        .await;

        Ok(ExportFile {
            filename: Self::filename(&format!("corsair-{}", user.id), format, now),
            format,
            body,
            records: 1,
        })
    }

    /// Delivers certified users not yet exported, to the Corsair API when
    /// configured or to a CSV file otherwise. Users are stamped only after
    /// delivery succeeds.
    pub async fn push_batch(state: &AppState, now: DateTime<Utc>) -> Result<ExportReport, ApiError> {
        let users = {
            let mut conn = state.db.get()?;
            UserRepository::list_certified(&mut conn, false)?
        };

        if users.is_empty() {
            info!("No certified users waiting for Corsair export");
            return Ok(ExportReport {
                users_exported: 0,
                destination: "none".into(),
            });
        }

        let records = Self::records(&users, &state.config.currency);

        let destination = match &state.corsair {
            Some(client) => {
                client
                    .push_batch(&CorsairBatch {
                        generated_at: now,
                        records,
                    })
                    .await?;
                "corsair_api".to_string()
            }
            None => {
                let dir = &state.config.corsair_details.export_dir;
                tokio::fs::create_dir_all(dir).await?;

                let path = dir.join(Self::filename("corsair-export", ExportFormat::Csv, now));
                let body = Self::render(records, ExportFormat::Csv, now)?;
                tokio::fs::write(&path, body).await?;

                warn!(path = %path.display(), "CORSAIR_API_URL not set, export written to disk");
                path.display().to_string()
            }
        };

        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        let mut conn = state.db.get()?;
        let users_exported = UserRepository::mark_exported(&mut conn, &ids, now)?;

        info!(users = users_exported, destination = %destination, "Corsair export delivered");

        Ok(ExportReport {
            users_exported,
            destination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reclaim_primitives::models::entities::enum_types::{CertificationStatus, UserRole};

    fn user(email: &str, certified: bool) -> User {
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 8, 30, 0).unwrap();
        User {
            id: Uuid::new_v4(),
            email: email.into(),
            name: Some("Ada".into()),
            role: UserRole::User,
            total_contributed: 2_500,
            total_impact: 25_000,
            matured_impact: 12_500,
            certification_status: if certified {
                CertificationStatus::Certified
            } else {
                CertificationStatus::Uncertified
            },
            certified_at: certified.then_some(at),
            corsair_exported_at: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn skips_uncertified_users() {
        let users = vec![user("a@x.io", true), user("b@x.io", false)];
        let records = CorsairService::records(&users, "EUR");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].email, "a@x.io");
        assert_eq!(records[0].currency, "EUR");
    }

    #[test]
    fn renders_csv_with_header() {
        let records = CorsairService::records(&[user("a@x.io", true)], "EUR");
        let body = CorsairService::render(records, ExportFormat::Csv, Utc::now()).unwrap();
        let text = String::from_utf8(body).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "user_id,email,name,certified_at,total_impact_grams,matured_impact_grams,total_contributed,currency"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("a@x.io,Ada,2026-05-01T08:30:00Z,25000,12500,2500,EUR"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn renders_json_batch() {
        let records = CorsairService::records(&[user("a@x.io", true)], "EUR");
        let body = CorsairService::render(records, ExportFormat::Json, Utc::now()).unwrap();
        let batch: CorsairBatch = serde_json::from_slice(&body).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].matured_impact_grams, 12_500);
    }
}
