use secrecy::SecretString;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CorsairInfo {
    pub corsair_api_url: Option<String>,
    pub corsair_api_key: Option<SecretString>,
    pub export_dir: PathBuf,
}

impl CorsairInfo {
    pub fn from_env() -> Self {
        Self {
            corsair_api_url: env::var("CORSAIR_API_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string()),
            corsair_api_key: env::var("CORSAIR_API_KEY")
                .ok()
                .map(|k| SecretString::new(k.into())),
            export_dir: env::var("CORSAIR_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./exports")),
        }
    }
}
