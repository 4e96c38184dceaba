//! Database operations.
//!
//! ## Tables
//!
//! - `coupons` - The coupon catalog
//! - `content_locker_links` - Advisory redirect links
//! - `site_settings` - Singleton appearance/copy configuration
//! - `admin_users` - Admin accounts
//! - `session` - Tower-sessions storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p dealgrove-cli -- migrate
//! ```
//!
//! Queries use the runtime sqlx API with explicit row structs mapped into
//! the domain types from `dealgrove-core`; a stored enum value the domain
//! does not know is surfaced as `RepositoryError::DataCorruption` rather
//! than silently skipped.

pub mod admin_users;
pub mod coupons;
pub mod links;
pub mod settings;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use admin_users::AdminUserRepository;
pub use coupons::CouponRepository;
pub use links::LinkRepository;
pub use settings::SettingsRepository;

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value no longer maps onto the domain types.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Unique constraint violation.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
