use crate::app_state::AppState;
use crate::repositories::audit_repository::AuditLogRepository;
use reclaim_primitives::models::entities::audit_log::NewAuditLog;
use tracing::warn;
use uuid::Uuid;

pub struct AuditService;

impl AuditService {
    /// Best effort: failures are logged and never reach the caller.
    pub async fn log_event(
        state: &AppState,
        actor_id: Option<Uuid>,
        action: &str,
        target_type: Option<&str>,
        target_id: Option<&str>,
        metadata: serde_json::Value,
    ) {
        let mut conn = match state.db.get() {
            Ok(conn) => conn,
            Err(e) => {
                warn!(action, error = %e, "No database connection for audit log");
                return;
            }
        };

        let new_log = NewAuditLog {
            actor_id,
            action: action.to_string(),
            target_type: target_type.map(|s| s.to_string()),
            target_id: target_id.map(|s| s.to_string()),
            metadata,
        };

        if let Err(e) = AuditLogRepository::create(&mut conn, new_log) {
            warn!(action, error = %e, "Failed to write audit log");
        }
    }
}
