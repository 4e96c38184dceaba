//! Admin authentication service.
//!
//! Credentials are compared as stored, without hashing. This is demo-grade
//! on purpose and documented as such; the generic failure message and the
//! absence of lockout/backoff are part of the preserved behavior.

use sqlx::PgPool;

use dealgrove_core::types::{AdminUserId, Email};

use crate::db::{AdminUserRepository, RepositoryError};
use crate::models::{AdminUser, CurrentAdmin};

/// Authentication and account management errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Email/password pair did not match. Deliberately carries no detail
    /// about which half was wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// A required field was empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// The submitted email is structurally invalid.
    #[error("Invalid email address")]
    InvalidEmail(#[from] dealgrove_core::types::EmailError),

    /// The target account no longer exists.
    #[error("Admin account not found")]
    AccountNotFound,

    /// Another account already uses the email.
    #[error("An account with this email already exists")]
    EmailTaken,

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(_) => Self::EmailTaken,
            other => Self::Repository(other),
        }
    }
}

/// Requested credential change for the admin account.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AccountUpdate {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    admins: AdminUserRepository<'a>,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            admins: AdminUserRepository::new(pool),
        }
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on any mismatch - wrong
    /// email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentAdmin, AuthError> {
        if email.is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        // A malformed email can't match a stored account; same generic error.
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, stored_password) = self
            .admins
            .get_with_password(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if password != stored_password {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(CurrentAdmin::from(&user))
    }

    /// Change the admin's email and password.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a field is empty or the confirmation
    /// does not match; nothing is applied in that case.
    pub async fn update_account(
        &self,
        id: AdminUserId,
        update: &AccountUpdate,
    ) -> Result<AdminUser, AuthError> {
        if update.email.is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if update.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        if update.password != update.password_confirm {
            return Err(AuthError::PasswordMismatch);
        }

        let email = Email::parse(&update.email)?;

        self.admins
            .update_credentials(id, &email, &update.password)
            .await?
            .ok_or(AuthError::AccountNotFound)
    }
}
