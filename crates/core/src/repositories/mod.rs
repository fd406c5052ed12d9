pub mod audit_repository;
pub mod gift_code_repository;
pub mod invoice_repository;
pub mod magic_link_repository;
pub mod merchant_repository;
pub mod partner_repository;
pub mod setting_repository;
pub mod transaction_repository;
pub mod user_repository;

pub use audit_repository::AuditLogRepository;
pub use gift_code_repository::GiftCodeRepository;
pub use invoice_repository::InvoiceRepository;
pub use magic_link_repository::MagicLinkRepository;
pub use merchant_repository::MerchantRepository;
pub use partner_repository::PartnerRepository;
pub use setting_repository::SettingRepository;
pub use transaction_repository::TransactionRepository;
pub use user_repository::UserRepository;
