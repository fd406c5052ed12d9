use eyre::{eyre, Report};
use secrecy::SecretString;
use std::env;

#[derive(Debug, Clone)]
pub struct SmtpInfo {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_starttls: bool,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<SecretString>,
    pub from_address: String,
}

impl SmtpInfo {
    /// Returns `None` when `SMTP_HOST` is unset; mail is then logged instead of sent.
    pub fn from_env() -> Result<Option<Self>, Report> {
        let Ok(smtp_host) = env::var("SMTP_HOST") else {
            return Ok(None);
        };

        Ok(Some(Self {
            smtp_host,
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".into())
                .parse()
                .map_err(|e| eyre!("Invalid SMTP_PORT: {}", e))?,
            smtp_starttls: env::var("SMTP_STARTTLS")
                .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD")
                .ok()
                .map(|p| SecretString::new(p.into())),
            from_address: env::var("SMTP_FROM")
                .unwrap_or_else(|_| "Reclaim <no-reply@reclaim.local>".into()),
        }))
    }
}
