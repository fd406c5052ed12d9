use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::export_dto::CorsairBatch;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

const CERTIFICATIONS_PATH: &str = "v1/certifications";

#[derive(Clone)]
pub struct CorsairClient {
    http: Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
struct CorsairErrorBody {
    message: Option<String>,
}

impl CorsairClient {
    pub fn new(http: Client, base_url: &str, api_key: Option<SecretString>) -> Result<Self, ApiError> {
        // trailing slash so join() appends instead of replacing the last segment
        let base = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base)
            .map_err(|_| ApiError::Internal("Invalid CORSAIR_API_URL".into()))?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub async fn push_batch(&self, batch: &CorsairBatch) -> Result<(), ApiError> {
        let url = self
            .base_url
            .join(CERTIFICATIONS_PATH)
            .map_err(|_| ApiError::Internal("Invalid Corsair URL path".into()))?;

        let mut request = self
            .http
            .post(url)
            .timeout(Duration::from_secs(30))
            .json(batch);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Corsair(format!("Corsair API unreachable: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .json::<CorsairErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| "no error detail".into());
            return Err(ApiError::Corsair(format!(
                "Corsair rejected batch ({}): {}",
                status, detail
            )));
        }

        info!(records = batch.records.len(), "Corsair batch accepted");
        Ok(())
    }
}
