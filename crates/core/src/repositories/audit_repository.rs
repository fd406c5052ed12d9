use diesel::prelude::*;
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::entities::audit_log::NewAuditLog;
use reclaim_primitives::schema::audit_logs;

pub struct AuditLogRepository;

impl AuditLogRepository {
    pub fn create(conn: &mut PgConnection, new_log: NewAuditLog) -> Result<(), ApiError> {
        diesel::insert_into(audit_logs::table)
            .values(&new_log)
            .execute(conn)
            .map_err(ApiError::Database)?;
        Ok(())
    }
}
