//! Coupon detail page and the public unlock flow.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::Serialize;
use std::time::Instant;
use uuid::Uuid;

use dealgrove_core::coupon::{Coupon, mask_code};
use dealgrove_core::types::CouponId;
use dealgrove_core::unlock::{UnlockPhase, phase_at};

use crate::db::{CouponRepository, LinkRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::services::SettingsService;
use crate::state::{AppState, UnlockSession};

use super::LayoutView;

/// Content locker display data.
pub struct LockerView {
    pub name: String,
    pub url: String,
}

/// Coupon display data for the detail page.
pub struct CouponDetailView {
    pub id: i64,
    pub store: String,
    pub description: String,
    pub discount: String,
    pub masked_code: String,
    /// Matches a `.gradient-*` class in the settings-driven stylesheet.
    pub category_key: String,
    pub expiry_display: String,
    pub is_expired: bool,
    pub verified: bool,
    pub rating_display: String,
    pub used_count: i32,
    pub image: Option<String>,
    pub locker: Option<LockerView>,
}

/// Detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "coupons/show.html")]
pub struct CouponShowTemplate {
    pub layout: LayoutView,
    pub coupon: CouponDetailView,
    pub unlock_button: String,
    pub copy_button: String,
    pub expired_badge: String,
}

/// Display the coupon detail page.
///
/// GET /coupons/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<CouponShowTemplate> {
    let coupon = fetch_coupon(&state, CouponId::new(id)).await?;
    let settings = SettingsService::new(state.pool()).effective().await?;

    // Dangling locker references are tolerated: the coupon keeps pointing at
    // the deleted id and the page simply shows no locker step.
    let locker = match coupon.content_locker_link_id {
        Some(link_id) => LinkRepository::new(state.pool())
            .get(link_id)
            .await?
            .filter(|link| link.active)
            .map(|link| LockerView {
                name: link.name,
                url: link.url,
            }),
        None => None,
    };

    let view = detail_view(&coupon, locker);
    let title = format!("{} | {}", coupon.store, settings.seo.title);

    Ok(CouponShowTemplate {
        coupon: view,
        unlock_button: settings.text_content.unlock_button.clone(),
        copy_button: settings.text_content.copy_button.clone(),
        expired_badge: settings.text_content.expired_badge.clone(),
        layout: LayoutView::from_settings(&settings).with_title(title),
    })
}

fn detail_view(coupon: &Coupon, locker: Option<LockerView>) -> CouponDetailView {
    let today = Utc::now().date_naive();
    CouponDetailView {
        id: coupon.id.as_i64(),
        store: coupon.store.clone(),
        description: coupon.description.clone(),
        discount: coupon.discount.clone(),
        masked_code: coupon.masked_code(),
        category_key: coupon.category.as_str().to_owned(),
        expiry_display: coupon.expiry_date.format("%b %d, %Y").to_string(),
        is_expired: coupon.is_expired(today),
        verified: coupon.verified,
        rating_display: format!("{:.1}", coupon.rating),
        used_count: coupon.used_count,
        image: coupon.image.clone(),
        locker,
    }
}

/// Response to starting an unlock.
#[derive(Debug, Serialize)]
pub struct StartUnlockResponse {
    pub token: Uuid,
    pub duration_ms: u64,
    pub tick_ms: u64,
}

/// Start the timed unlock for a coupon.
///
/// POST /coupons/{id}/unlock
pub async fn start_unlock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StartUnlockResponse>> {
    let coupon = fetch_coupon(&state, CouponId::new(id)).await?;

    if coupon.is_expired(Utc::now().date_naive()) {
        return Err(AppError::BadRequest("Coupon has expired".to_owned()));
    }

    // Usage is fire-and-forget: a failed bump must not block the unlock.
    if let Err(e) = CouponRepository::new(state.pool())
        .increment_used(coupon.id)
        .await
    {
        tracing::warn!(error = %e, coupon_id = %coupon.id, "failed to bump used_count");
    }

    let token = Uuid::new_v4();
    state
        .unlocks()
        .insert(
            token,
            UnlockSession {
                coupon_id: coupon.id,
                code: coupon.code.clone(),
                redirect_url: coupon.redirect_url.clone(),
                started_at: Instant::now(),
            },
        )
        .await;

    let config = state.unlock_config();
    Ok(Json(StartUnlockResponse {
        token,
        duration_ms: u64::try_from(config.duration.as_millis()).unwrap_or(u64::MAX),
        tick_ms: u64::try_from(config.tick.as_millis()).unwrap_or(u64::MAX),
    }))
}

/// Response to an unlock poll.
#[derive(Debug, Serialize)]
pub struct PollUnlockResponse {
    pub phase: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

/// Poll an unlock in progress.
///
/// GET /unlock/{token}
///
/// The code stays masked until the reveal; the redirect target appears only
/// once the grace period is over. Expired or unknown tokens are a 404 - the
/// flow has no cancellation, abandoned tokens just age out.
pub async fn poll_unlock(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<Json<PollUnlockResponse>> {
    let session = state
        .unlocks()
        .get(&token)
        .await
        .ok_or_else(|| AppError::NotFound("Unlock not found or expired".to_owned()))?;

    let response = match phase_at(state.unlock_config(), session.started_at.elapsed()) {
        UnlockPhase::Unlocking { progress } => PollUnlockResponse {
            phase: "unlocking",
            progress: Some(progress),
            code: mask_code(&session.code),
            redirect_url: None,
        },
        UnlockPhase::Revealed => PollUnlockResponse {
            phase: "revealed",
            progress: None,
            code: session.code.clone(),
            redirect_url: None,
        },
        UnlockPhase::Redirect => PollUnlockResponse {
            phase: "redirect",
            progress: None,
            code: session.code.clone(),
            redirect_url: session.redirect_url.clone(),
        },
    };

    Ok(Json(response))
}

async fn fetch_coupon(state: &AppState, id: CouponId) -> Result<Coupon> {
    CouponRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Coupon not found".to_owned()))
}
