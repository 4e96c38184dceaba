//! Admin account management commands.

use dealgrove_core::types::Email;

use super::CliError;

/// Create an admin account.
///
/// # Errors
///
/// Returns `CliError::InvalidInput` for a malformed email or empty
/// password, and a database error if the insert fails (including a
/// duplicate email).
pub async fn create(email: &str, password: &str, role: &str) -> Result<(), CliError> {
    let email = Email::parse(email).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    if password.is_empty() {
        return Err(CliError::InvalidInput("password cannot be empty".to_owned()));
    }

    let pool = super::connect().await?;

    let row: (i64,) = sqlx::query_as(
        "INSERT INTO admin_users (email, password, role) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(email.as_str())
    .bind(password)
    .bind(role)
    .fetch_one(&pool)
    .await?;

    tracing::info!(admin_id = row.0, email = %email, role, "admin account created");
    Ok(())
}
