//! Design-token stylesheet rendered from the site settings.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use dealgrove_core::theme::render_css;

use crate::error::Result;
use crate::services::SettingsService;
use crate::state::AppState;

/// Serve the settings-driven design tokens.
///
/// GET /theme.css
///
/// Served with a short cache lifetime so admin color changes show up on the
/// next page load without a deploy.
pub async fn theme_css(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let settings = SettingsService::new(state.pool()).effective().await?;
    let css = render_css(&settings);

    Ok((
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=60"),
        ],
        css,
    ))
}
