//! Business services layered over the repositories.

pub mod auth;
pub mod settings;

pub use auth::{AdminAuthService, AuthError};
pub use settings::SettingsService;
