pub mod contributions;
pub mod cron;
pub mod exports;
pub mod gift_codes;
pub mod invoices;
pub mod merchants;
pub mod partners;
pub mod settings;
pub mod transactions;
pub mod users;
