pub mod audit_log;
pub mod enum_types;
pub mod gift_code;
pub mod invoice;
pub mod magic_link;
pub mod merchant;
pub mod partner;
pub mod setting;
pub mod transaction;
pub mod user;

pub use audit_log::*;
pub use enum_types::*;
pub use gift_code::*;
pub use invoice::*;
pub use magic_link::*;
pub use merchant::*;
pub use partner::*;
pub use setting::*;
pub use transaction::*;
pub use user::*;
