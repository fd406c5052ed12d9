use chrono::Utc;
use diesel::prelude::*;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::setting::{NewSetting, Setting};
use reclaim_primitives::schema::settings;

pub struct SettingRepository;

impl SettingRepository {
    pub fn list(conn: &mut PgConnection) -> Result<Vec<Setting>, ApiError> {
        settings::table
            .order(settings::key.asc())
            .load::<Setting>(conn)
            .map_err(ApiError::from)
    }

    pub fn upsert(conn: &mut PgConnection, key: &str, value: &str) -> Result<Setting, ApiError> {
        diesel::insert_into(settings::table)
            .values(&NewSetting { key, value })
            .on_conflict(settings::key)
            .do_update()
            .set((
                settings::value.eq(value),
                settings::updated_at.eq(Utc::now()),
            ))
            .get_result::<Setting>(conn)
            .map_err(ApiError::from)
    }
}
