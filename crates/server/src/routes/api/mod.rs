//! Admin JSON API.
//!
//! Everything under `/api` except `/api/auth/login` requires an admin
//! session; handlers opt in via the `RequireAdminAuth` extractor.

pub mod auth;
pub mod coupons;
pub mod dashboard;
pub mod links;
pub mod settings;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

/// Create the admin API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Auth & account
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/account", put(auth::update_account))
        // Coupons
        .route("/coupons", get(coupons::list).post(coupons::create))
        .route("/coupons/export", get(coupons::export))
        .route("/coupons/import", post(coupons::import))
        .route("/coupons/bulk-delete", post(coupons::bulk_delete))
        .route("/coupons/bulk-update", post(coupons::bulk_update))
        .route(
            "/coupons/{id}",
            get(coupons::get_one)
                .patch(coupons::update)
                .delete(coupons::delete),
        )
        // Content locker links
        .route("/links", get(links::list).post(links::create))
        .route("/links/export", get(links::export))
        .route("/links/import", post(links::import))
        .route(
            "/links/{id}",
            get(links::get_one)
                .patch(links::update)
                .delete(links::delete),
        )
        // Site settings
        .route(
            "/settings",
            get(settings::get_settings).put(settings::replace),
        )
        .route("/settings/nav-bar", patch(settings::patch_nav_bar))
        .route("/settings/colors", patch(settings::patch_colors))
        .route("/settings/general", patch(settings::patch_general))
        .route("/settings/seo", patch(settings::patch_seo))
        .route("/settings/text-content", patch(settings::patch_text_content))
        .route("/settings/theme", put(settings::set_theme))
        // Dashboard
        .route("/dashboard", get(dashboard::stats))
}
