//! Admin account repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dealgrove_core::types::{AdminUserId, Email};

use super::RepositoryError;
use crate::models::AdminUser;

const COLUMNS: &str = "id, email, role, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: i64,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AdminUserRow {
    fn into_domain(self) -> Result<AdminUser, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(AdminUser {
            id: AdminUserId::new(self.id),
            email,
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for admin account operations.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an admin with their stored password by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if the stored email is invalid.
    pub async fn get_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS}, password FROM admin_users WHERE email = $1");

        #[derive(sqlx::FromRow)]
        struct RowWithPassword {
            #[sqlx(flatten)]
            user: AdminUserRow,
            password: String,
        }

        let row = sqlx::query_as::<_, RowWithPassword>(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some((r.user.into_domain()?, r.password))),
            None => Ok(None),
        }
    }

    /// Replace an admin's email and password.
    ///
    /// Returns `Ok(None)` when the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new email is taken.
    pub async fn update_credentials(
        &self,
        id: AdminUserId,
        email: &Email,
        password: &str,
    ) -> Result<Option<AdminUser>, RepositoryError> {
        let sql = format!(
            "UPDATE admin_users SET email = $2, password = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AdminUserRow>(&sql)
            .bind(id.as_i64())
            .bind(email.as_str())
            .bind(password)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("email already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;
        row.map(AdminUserRow::into_domain).transpose()
    }
}
