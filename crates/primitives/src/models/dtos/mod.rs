pub mod auth_dto;
pub mod cron_dto;
pub mod export_dto;
pub mod gift_code_dto;
pub mod impact_dto;
pub mod invoice_dto;
pub mod merchant_dto;
pub mod pagination;
pub mod setting_dto;
pub mod transaction_dto;
pub mod user_dto;

pub use auth_dto::*;
pub use cron_dto::*;
pub use export_dto::*;
pub use gift_code_dto::*;
pub use impact_dto::*;
pub use invoice_dto::*;
pub use merchant_dto::*;
pub use pagination::*;
pub use setting_dto::*;
pub use transaction_dto::*;
pub use user_dto::*;
