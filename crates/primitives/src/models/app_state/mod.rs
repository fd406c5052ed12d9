pub mod app_config;
pub mod corsair_details;
pub mod jwt_details;
pub mod smtp_details;

pub use app_config::*;
pub use corsair_details::*;
pub use jwt_details::*;
pub use smtp_details::*;
