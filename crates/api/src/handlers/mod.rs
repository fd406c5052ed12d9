pub mod admin;
pub mod auth;
pub mod gift_codes;
pub mod health;
pub mod impact;
pub mod me;
pub mod merchant;
