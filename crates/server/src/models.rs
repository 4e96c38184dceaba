//! Server-side domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dealgrove_core::types::{AdminUserId, Email};

/// Session storage keys.
pub mod session_keys {
    /// The logged-in admin identity.
    pub const CURRENT_ADMIN: &str = "current_admin";
}

/// An admin account (domain type).
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: Email,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The admin identity carried in the session.
///
/// A snapshot taken at login; credential changes take effect on the next
/// login, not retroactively on live sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: AdminUserId,
    pub email: String,
    pub role: String,
}

impl From<&AdminUser> for CurrentAdmin {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_owned(),
            role: user.role.clone(),
        }
    }
}
