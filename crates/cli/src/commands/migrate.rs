//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! dg-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DEALGROVE_DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migration files live in `crates/server/migrations/` and are embedded at
//! compile time, so the binary can migrate any environment it can reach.

use super::CliError;

/// Run the server database migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
