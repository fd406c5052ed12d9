pub mod audit_service;
pub mod auth_service;
pub mod billing_service;
pub mod calculation_service;
pub mod contribution_service;
pub mod corsair_service;
pub mod cron_service;
pub mod gift_code_service;
pub mod maturation_service;
pub mod merchant_service;
pub mod partner_service;
pub mod settings_service;
pub mod transaction_service;
pub mod user_service;
