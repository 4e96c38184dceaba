//! Middleware and extractors.

mod auth;
mod session;

pub use auth::RequireAdminAuth;
pub use session::{SESSION_COOKIE_NAME, create_session_layer, migrate_session_store};
