use reclaim_core::services::auth_service::MagicLinkService;
use reclaim_core::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, error, info};

const DAILY_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60 * 24);

pub fn spawn_background_tasks(state: Arc<AppState>) {
    tokio::spawn(async move {
        info!("Starting daily magic link cleanup task");
        cleanup_magic_links(state).await;
    });

    info!("Background maintenance tasks spawned");
}

async fn cleanup_magic_links(state: Arc<AppState>) {
    let mut interval = interval(DAILY_CLEANUP_INTERVAL);
    // skip the immediate first tick
    interval.tick().await;

    loop {
        interval.tick().await;

        let Ok(mut conn) = state.db.get() else {
            error!("Magic link cleanup: DB connection failed");
            continue;
        };

        match MagicLinkService::purge_stale(&mut conn) {
            Ok(0) => debug!("No stale magic links"),
            Ok(n) => info!("Removed {} expired or used magic links", n),
            Err(e) => error!("Magic link cleanup failed: {}", e),
        }
    }
}
