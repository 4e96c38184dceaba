//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Public pages
//! GET  /                      - Catalog home (featured + filtered list)
//! GET  /coupons/{id}          - Coupon detail with unlock flow
//! GET  /theme.css             - Design tokens rendered from site settings
//!
//! # Public unlock API
//! POST /coupons/{id}/unlock   - Start the timed unlock, returns a token
//! GET  /unlock/{token}        - Poll unlock progress / reveal / redirect
//!
//! # Health
//! GET  /health                - Liveness
//! GET  /health/ready          - Readiness (database round-trip)
//!
//! # Admin API (session-guarded JSON, see api module)
//! /api/auth/*  /api/account  /api/coupons*  /api/links*  /api/settings*  /api/dashboard
//! ```

pub mod api;
pub mod coupons;
pub mod home;
pub mod theme;

use axum::{
    Router,
    routing::{get, post},
};

use dealgrove_core::settings::SiteSettings;
use dealgrove_core::theme::ui_gradient_class;

use crate::state::AppState;

/// Fields the base layout template renders on every page.
pub struct LayoutView {
    pub title: String,
    pub meta_description: String,
    pub favicon: String,
    pub brand_name: String,
    pub nav_buttons: Vec<NavButtonView>,
    pub show_particles: bool,
    pub body_class: String,
    pub footer_text: String,
    pub site_description: String,
}

/// One navigation button.
pub struct NavButtonView {
    pub label: String,
    pub href: String,
}

impl LayoutView {
    /// Build the layout chrome from the effective settings.
    #[must_use]
    pub fn from_settings(settings: &SiteSettings) -> Self {
        let body_class = format!(
            "theme-{} {}",
            settings.theme,
            ui_gradient_class(&settings.colors.ui_gradient)
        );

        Self {
            title: settings.seo.title.clone(),
            meta_description: settings.seo.description.clone(),
            favicon: settings.seo.favicon.clone(),
            brand_name: settings.nav_bar.brand_name.clone(),
            nav_buttons: settings
                .nav_bar
                .buttons
                .iter()
                .map(|b| NavButtonView {
                    label: b.label.clone(),
                    href: b.href.clone(),
                })
                .collect(),
            show_particles: settings.nav_bar.show_particles,
            body_class,
            footer_text: settings.general.footer_text.clone(),
            site_description: settings.general.site_description.clone(),
        }
    }

    /// Override the document title (detail pages prepend the store name).
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Public pages
        .route("/", get(home::home))
        .route("/coupons/{id}", get(coupons::show))
        .route("/theme.css", get(theme::theme_css))
        // Public unlock API
        .route("/coupons/{id}/unlock", post(coupons::start_unlock))
        .route("/unlock/{token}", get(coupons::poll_unlock))
        // Admin API
        .nest("/api", api::routes())
}
