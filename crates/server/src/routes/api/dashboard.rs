//! Admin dashboard stats.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::db::{CouponRepository, LinkRepository};
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Counts for the dashboard header cards.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub coupons: CouponStats,
    pub links: LinkStats,
}

#[derive(Debug, Serialize)]
pub struct CouponStats {
    pub total: i64,
    pub active: i64,
    pub expired: i64,
    pub upcoming: i64,
    pub featured: i64,
}

#[derive(Debug, Serialize)]
pub struct LinkStats {
    pub total: i64,
}

/// Catalog and link counts.
///
/// GET /api/dashboard
pub async fn stats(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<DashboardResponse>> {
    let counts = CouponRepository::new(state.pool()).counts().await?;
    let link_count = LinkRepository::new(state.pool()).count().await?;

    Ok(Json(DashboardResponse {
        coupons: CouponStats {
            total: counts.total,
            active: counts.active,
            expired: counts.expired,
            upcoming: counts.upcoming,
            featured: counts.featured,
        },
        links: LinkStats { total: link_count },
    }))
}
