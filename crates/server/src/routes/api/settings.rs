//! Admin site settings endpoints.
//!
//! GET returns the effective settings (stored merged over defaults), so the
//! admin UI always edits the fully populated object. Updates persist locally
//! first in spirit: the response reflects the applied object even though the
//! write and the response come from the same round-trip here.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use dealgrove_core::settings::{SettingsSection, SiteSettings, Theme};

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::services::SettingsService;
use crate::state::AppState;

/// The effective site settings.
///
/// GET /api/settings
pub async fn get_settings(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<SiteSettings>> {
    let settings = SettingsService::new(state.pool()).effective().await?;
    Ok(Json(settings))
}

/// Replace the settings wholesale.
///
/// PUT /api/settings
#[instrument(skip(state, body))]
pub async fn replace(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(body): Json<SiteSettings>,
) -> Result<Json<SiteSettings>> {
    let settings = SettingsService::new(state.pool()).replace(&body).await?;
    tracing::info!("site settings replaced");
    Ok(Json(settings))
}

/// PATCH /api/settings/nav-bar
pub async fn patch_nav_bar(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(patch): Json<Value>,
) -> Result<Json<SiteSettings>> {
    patch_section(&state, SettingsSection::NavBar, &patch).await
}

/// PATCH /api/settings/colors
pub async fn patch_colors(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(patch): Json<Value>,
) -> Result<Json<SiteSettings>> {
    patch_section(&state, SettingsSection::Colors, &patch).await
}

/// PATCH /api/settings/general
pub async fn patch_general(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(patch): Json<Value>,
) -> Result<Json<SiteSettings>> {
    patch_section(&state, SettingsSection::General, &patch).await
}

/// PATCH /api/settings/seo
pub async fn patch_seo(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(patch): Json<Value>,
) -> Result<Json<SiteSettings>> {
    patch_section(&state, SettingsSection::Seo, &patch).await
}

/// PATCH /api/settings/text-content
pub async fn patch_text_content(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(patch): Json<Value>,
) -> Result<Json<SiteSettings>> {
    patch_section(&state, SettingsSection::TextContent, &patch).await
}

async fn patch_section(
    state: &AppState,
    section: SettingsSection,
    patch: &Value,
) -> Result<Json<SiteSettings>> {
    let settings = SettingsService::new(state.pool())
        .patch_section(section, patch)
        .await?;
    Ok(Json(settings))
}

/// Theme switch request body.
#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub theme: Theme,
}

/// Switch the light/dark theme.
///
/// PUT /api/settings/theme
#[instrument(skip(state))]
pub async fn set_theme(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(body): Json<ThemeRequest>,
) -> Result<Json<SiteSettings>> {
    let settings = SettingsService::new(state.pool())
        .set_theme(body.theme)
        .await?;
    Ok(Json(settings))
}
