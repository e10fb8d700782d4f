pub mod app_error;
pub mod jwt;
pub mod query;
pub mod totp;
pub mod use_cases;
pub mod validators;
