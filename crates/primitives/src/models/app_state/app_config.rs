use crate::models::app_state::corsair_details::CorsairInfo;
use crate::models::app_state::jwt_details::JWTInfo;
use crate::models::app_state::smtp_details::SmtpInfo;
use eyre::Report;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_details: JWTInfo,

    pub app_url: String,

    pub frontend_url: String,

    pub currency: String,

    pub admin_emails: Vec<String>,

    pub smtp_details: Option<SmtpInfo>,

    pub corsair_details: CorsairInfo,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Report> {
        Ok(Self {
            jwt_details: JWTInfo::new()?,

            app_url: env::var("APP_URL").unwrap_or_else(|_| "http://localhost:8080".into()),

            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),

            currency: env::var("CURRENCY").unwrap_or_else(|_| "EUR".into()),

            admin_emails: parse_email_list(&env::var("ADMIN_EMAILS").unwrap_or_default()),

            smtp_details: SmtpInfo::from_env()?,

            corsair_details: CorsairInfo::from_env(),
        })
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|admin| admin == email)
    }
}

pub fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_email_list;

    #[test]
    fn parses_admin_list() {
        assert_eq!(
            parse_email_list(" Ops@Reclaim.io, ,finance@reclaim.io"),
            vec!["ops@reclaim.io".to_string(), "finance@reclaim.io".to_string()]
        );
        assert!(parse_email_list("").is_empty());
    }
}
