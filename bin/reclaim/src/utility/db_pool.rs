use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use eyre::{eyre, Report};
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::time::Duration;
use tracing::info;

pub fn create_db_pool() -> Result<Pool<ConnectionManager<PgConnection>>, Report> {
    let db_url = SecretString::new(
        env::var("DATABASE_URL")
            .map_err(|_| eyre!("DATABASE_URL must be set"))?
            .into(),
    );

    let max_size = env::var("DB_POOL_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(20);

    let manager = ConnectionManager::<PgConnection>::new(db_url.expose_secret());

    let pool = Pool::builder()
        .max_size(max_size)
        .min_idle(Some(2))
        .connection_timeout(Duration::from_secs(8))
        .idle_timeout(Some(Duration::from_secs(300)))
        .max_lifetime(Some(Duration::from_secs(1800))) // 30 minutes
        .test_on_check_out(true)
        .build(manager)?;

    info!(max_size, "PostgreSQL connection pool created");

    Ok(pool)
}
