use diesel::r2d2::{self, ConnectionManager};
use diesel::PgConnection;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

use crate::clients::{CorsairClient, EmailClient};
use eyre::Result;
pub use reclaim_primitives::models::app_state::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub email: EmailClient,
    /// `None` when `CORSAIR_API_URL` is unset; exports then go to files.
    pub corsair: Option<CorsairClient>,
}

impl AppState {
    pub fn new(db: DbPool, config: AppConfig) -> Result<Arc<Self>> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let email = EmailClient::new(config.smtp_details.as_ref())?;

        let corsair = config
            .corsair_details
            .corsair_api_url
            .as_deref()
            .map(|url| {
                CorsairClient::new(
                    http,
                    url,
                    config.corsair_details.corsair_api_key.clone(),
                )
            })
            .transpose()?;

        Ok(Arc::new(Self {
            db,
            config,
            email,
            corsair,
        }))
    }
}
