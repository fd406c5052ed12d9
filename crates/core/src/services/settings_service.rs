use crate::app_state::AppState;
use crate::repositories::setting_repository::SettingRepository;
use crate::services::audit_service::AuditService;
use crate::services::calculation_service::{MaturationSchedule, MAX_STAGE_DAYS};
use diesel::prelude::*;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::setting::Setting;
use reclaim_primitives::models::setting_dto::{SettingEntry, SettingsResponse};
use std::collections::HashMap;
use std::str::FromStr;
use strum::{Display, EnumString};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SettingKey {
    GramsPerUnit,
    DefaultMultiplierBps,
    CertificationThresholdGrams,
    MaturationFirstStageDays,
    MaturationFinalStageDays,
    MagicLinkTtlMinutes,
}

impl SettingKey {
    pub const ALL: [SettingKey; 6] = [
        SettingKey::GramsPerUnit,
        SettingKey::DefaultMultiplierBps,
        SettingKey::CertificationThresholdGrams,
        SettingKey::MaturationFirstStageDays,
        SettingKey::MaturationFinalStageDays,
        SettingKey::MagicLinkTtlMinutes,
    ];

    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        SettingKey::from_str(raw.trim())
            .map_err(|_| ApiError::BadRequest(format!("Unknown setting: {}", raw)))
    }
}

/// Effective business settings, with defaults for missing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpactSettings {
    pub grams_per_unit: i64,
    pub default_multiplier_bps: i32,
    pub certification_threshold_grams: i64,
    pub first_stage_days: i64,
    pub final_stage_days: i64,
    pub magic_link_ttl_minutes: i64,
}

impl Default for ImpactSettings {
    fn default() -> Self {
        let schedule = MaturationSchedule::default();
        Self {
            grams_per_unit: 1_000,
            default_multiplier_bps: 10_000,
            certification_threshold_grams: 10_000,
            first_stage_days: schedule.first_stage_days,
            final_stage_days: schedule.final_stage_days,
            magic_link_ttl_minutes: 15,
        }
    }
}

impl ImpactSettings {
    pub fn get(&self, key: SettingKey) -> i64 {
        match key {
            SettingKey::GramsPerUnit => self.grams_per_unit,
            SettingKey::DefaultMultiplierBps => self.default_multiplier_bps as i64,
            SettingKey::CertificationThresholdGrams => self.certification_threshold_grams,
            SettingKey::MaturationFirstStageDays => self.first_stage_days,
            SettingKey::MaturationFinalStageDays => self.final_stage_days,
            SettingKey::MagicLinkTtlMinutes => self.magic_link_ttl_minutes,
        }
    }

    fn set(&mut self, key: SettingKey, value: i64) {
        match key {
            SettingKey::GramsPerUnit => self.grams_per_unit = value,
            SettingKey::DefaultMultiplierBps => self.default_multiplier_bps = value as i32,
            SettingKey::CertificationThresholdGrams => self.certification_threshold_grams = value,
            SettingKey::MaturationFirstStageDays => self.first_stage_days = value,
            SettingKey::MaturationFinalStageDays => self.final_stage_days = value,
            SettingKey::MagicLinkTtlMinutes => self.magic_link_ttl_minutes = value,
        }
    }

    pub fn schedule(&self) -> MaturationSchedule {
        MaturationSchedule {
            first_stage_days: self.first_stage_days,
            final_stage_days: self.final_stage_days,
        }
    }

    /// Unknown keys and unparsable rows are skipped so a bad row cannot
    /// take the ledger down.
    pub fn from_rows(rows: &[Setting]) -> Self {
        let mut settings = Self::default();

        for row in rows {
            let Ok(key) = SettingKey::from_str(&row.key) else {
                continue;
            };
            match SettingsService::validate(key, &row.value, &Self::unbounded()) {
                Ok(value) => settings.set(key, value),
                Err(e) => warn!(key = %row.key, error = %e, "Ignoring invalid stored setting"),
            }
        }

        if settings.final_stage_days <= settings.first_stage_days {
            warn!(
                first = settings.first_stage_days,
                last = settings.final_stage_days,
                "Stored maturation stages are out of order, using defaults"
            );
            let schedule = MaturationSchedule::default();
            settings.first_stage_days = schedule.first_stage_days;
            settings.final_stage_days = schedule.final_stage_days;
        }

        settings
    }

    // cross-key bounds are checked once all rows are read
    fn unbounded() -> Self {
        Self {
            first_stage_days: 0,
            final_stage_days: i64::MAX,
            ..Self::default()
        }
    }
}

pub struct SettingsService;

impl SettingsService {
    pub fn load(conn: &mut PgConnection) -> Result<ImpactSettings, ApiError> {
        let rows = SettingRepository::list(conn)?;
        Ok(ImpactSettings::from_rows(&rows))
    }

    /// Parses `raw` for `key` and checks it against the other current values.
    pub fn validate(key: SettingKey, raw: &str, current: &ImpactSettings) -> Result<i64, ApiError> {
        let value: i64 = raw.trim().parse().map_err(|_| {
            ApiError::BadRequest(format!("{} must be an integer", key))
        })?;

        let ok = match key {
            SettingKey::DefaultMultiplierBps => value > 0 && value <= i32::MAX as i64,
            SettingKey::MaturationFirstStageDays => {
                value > 0 && value < current.final_stage_days && value < MAX_STAGE_DAYS
            }
            SettingKey::MaturationFinalStageDays => {
                value > current.first_stage_days && value <= MAX_STAGE_DAYS
            }
            SettingKey::MagicLinkTtlMinutes => (1..=1_440).contains(&value),
            SettingKey::GramsPerUnit | SettingKey::CertificationThresholdGrams => value > 0,
        };

        if !ok {
            let rule = match key {
                SettingKey::MaturationFirstStageDays => format!(
                    "must be positive and below maturation_final_stage_days and {}",
                    MAX_STAGE_DAYS
                ),
                SettingKey::MaturationFinalStageDays => format!(
                    "must be greater than maturation_first_stage_days and at most {}",
                    MAX_STAGE_DAYS
                ),
                SettingKey::MagicLinkTtlMinutes => "must be between 1 and 1440".to_string(),
                _ => "must be positive".to_string(),
            };
            return Err(ApiError::BadRequest(format!("{} {}", key, rule)));
        }

        Ok(value)
    }

    pub async fn list(state: &AppState) -> Result<SettingsResponse, ApiError> {
        let mut conn = state.db.get()?;
        let rows = SettingRepository::list(&mut conn)?;
        let effective = ImpactSettings::from_rows(&rows);

        let stored: HashMap<&str, &Setting> = rows.iter().map(|r| (r.key.as_str(), r)).collect();

        let settings = SettingKey::ALL
            .iter()
            .map(|key| {
                let name = key.to_string();
                let row = stored.get(name.as_str());
                SettingEntry {
                    value: effective.get(*key).to_string(),
                    is_default: row.is_none(),
                    updated_at: row.map(|r| r.updated_at),
                    key: name,
                }
            })
            .collect();

        Ok(SettingsResponse { settings })
    }

    pub async fn update(
        state: &AppState,
        admin_id: Uuid,
        raw_key: &str,
        raw_value: &str,
    ) -> Result<SettingEntry, ApiError> {
        let key = SettingKey::parse(raw_key)?;
        let mut conn = state.db.get()?;

        let setting = conn.transaction::<_, ApiError, _>(|conn| {
            let current = Self::load(conn)?;
            let value = Self::validate(key, raw_value, &current)?;
            SettingRepository::upsert(conn, &key.to_string(), &value.to_string())
        })?;

        AuditService::log_event(
            state,
            Some(admin_id),
            "settings.update",
            Some("setting"),
            Some(&setting.key),
            serde_json::json!({ "value": setting.value }),
        )
        .await;

        info!(key = %setting.key, value = %setting.value, "Setting updated");

        Ok(SettingEntry {
            key: setting.key,
            value: setting.value,
            is_default: false,
            updated_at: Some(setting.updated_at),
        })
    }
}
