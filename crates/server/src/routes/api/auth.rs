//! Admin session and account endpoints.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::{CurrentAdmin, session_keys};
use crate::services::AdminAuthService;
use crate::services::auth::AccountUpdate;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub admin: CurrentAdmin,
}

/// Log in with email and password.
///
/// POST /api/auth/login
///
/// Any mismatch yields the same generic 401; there is no lockout or
/// backoff.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AdminAuthService::new(state.pool());
    let admin = auth.login(&body.email, &body.password).await?;

    session
        .insert(session_keys::CURRENT_ADMIN, admin.clone())
        .await
        .map_err(|e| AppError::Internal(format!("failed to store session: {e}")))?;

    tracing::info!(admin_id = %admin.id, "admin logged in");
    Ok(Json(LoginResponse {
        success: true,
        admin,
    }))
}

/// Logout response.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Destroy the admin session.
///
/// POST /api/auth/logout
pub async fn logout(session: Session) -> Result<Json<LogoutResponse>> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("failed to destroy session: {e}")))?;
    Ok(Json(LogoutResponse { success: true }))
}

/// Current admin identity.
///
/// GET /api/auth/me
pub async fn me(RequireAdminAuth(admin): RequireAdminAuth) -> Json<CurrentAdmin> {
    Json(admin)
}

/// Account update response.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub success: bool,
    pub admin: CurrentAdmin,
}

/// Change the admin email/password.
///
/// PUT /api/account
///
/// Requires a matching password confirmation; a mismatch aborts without
/// applying anything.
#[instrument(skip(state, session, body))]
pub async fn update_account(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Json(body): Json<AccountUpdate>,
) -> Result<Json<AccountResponse>> {
    let auth = AdminAuthService::new(state.pool());
    let updated = auth.update_account(admin.id, &body).await?;

    // Refresh the session snapshot so /auth/me reflects the new email.
    let current = CurrentAdmin::from(&updated);
    session
        .insert(session_keys::CURRENT_ADMIN, current.clone())
        .await
        .map_err(|e| AppError::Internal(format!("failed to refresh session: {e}")))?;

    Ok(Json(AccountResponse {
        success: true,
        admin: current,
    }))
}
