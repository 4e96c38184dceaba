//! Admin coupon CRUD, bulk operations, and import/export.

use axum::{
    Json,
    extract::{Path, Query, State},
    extract::rejection::JsonRejection,
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use dealgrove_core::coupon::{CatalogFilter, Coupon, CouponExport, NewCoupon, SortOrder, UpdateCoupon};
use dealgrove_core::types::CouponId;

use crate::db::CouponRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::routes::home::CatalogQuery;
use crate::state::AppState;

/// List coupons with the catalog filter/sort vocabulary.
///
/// GET /api/coupons?filter=...&sort=...
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<Coupon>>> {
    let (filter, sort) = query.parsed()?;
    let coupons = CouponRepository::new(state.pool()).list(filter, sort).await?;
    Ok(Json(coupons))
}

/// Get one coupon.
///
/// GET /api/coupons/{id}
pub async fn get_one(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i64>,
) -> Result<Json<Coupon>> {
    let coupon = CouponRepository::new(state.pool())
        .get(CouponId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Coupon not found".to_owned()))?;
    Ok(Json(coupon))
}

/// Create a coupon.
///
/// POST /api/coupons
///
/// Identity and timestamps are minted server-side; rating and use count are
/// normalized into range.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(body): Json<NewCoupon>,
) -> Result<(StatusCode, Json<Coupon>)> {
    let coupon = CouponRepository::new(state.pool()).create(&body).await?;
    tracing::info!(coupon_id = %coupon.id, store = %coupon.store, "coupon created");
    Ok((StatusCode::CREATED, Json(coupon)))
}

/// Merge a partial update onto a coupon.
///
/// PATCH /api/coupons/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCoupon>,
) -> Result<Json<Coupon>> {
    let coupon = CouponRepository::new(state.pool())
        .update(CouponId::new(id), &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Coupon not found".to_owned()))?;
    Ok(Json(coupon))
}

/// Deletion report: deleting an id that never existed still succeeds.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: u64,
}

/// Delete a coupon.
///
/// DELETE /api/coupons/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>> {
    let deleted = CouponRepository::new(state.pool())
        .delete(CouponId::new(id))
        .await?;
    Ok(Json(DeleteResponse {
        success: true,
        deleted,
    }))
}

/// Bulk delete request body.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<CouponId>,
}

/// Delete every listed coupon.
///
/// POST /api/coupons/bulk-delete
#[instrument(skip(state, body))]
pub async fn bulk_delete(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(body): Json<BulkDeleteRequest>,
) -> Result<Json<DeleteResponse>> {
    let deleted = CouponRepository::new(state.pool())
        .bulk_delete(&body.ids)
        .await?;
    tracing::info!(requested = body.ids.len(), deleted, "bulk coupon delete");
    Ok(Json(DeleteResponse {
        success: true,
        deleted,
    }))
}

/// Bulk update request body.
#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    pub ids: Vec<CouponId>,
    pub fields: UpdateCoupon,
}

/// Bulk update report.
#[derive(Debug, Serialize)]
pub struct BulkUpdateResponse {
    pub success: bool,
    pub updated: u64,
}

/// Apply the same partial update to every listed coupon.
///
/// POST /api/coupons/bulk-update
#[instrument(skip(state, body))]
pub async fn bulk_update(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(body): Json<BulkUpdateRequest>,
) -> Result<Json<BulkUpdateResponse>> {
    let updated = CouponRepository::new(state.pool())
        .bulk_update(&body.ids, &body.fields)
        .await?;
    Ok(Json(BulkUpdateResponse {
        success: true,
        updated,
    }))
}

/// Export all coupons minus identity/timestamp fields.
///
/// GET /api/coupons/export
///
/// Served as an attachment with a timestamped filename.
pub async fn export(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<impl IntoResponse> {
    let coupons = CouponRepository::new(state.pool())
        .list(CatalogFilter::All, SortOrder::Newest)
        .await?;
    let exports: Vec<CouponExport> = coupons.into_iter().map(Into::into).collect();

    let filename = format!(
        "coupons-export-{}.json",
        Utc::now().format("%Y%m%d-%H%M%S")
    );
    Ok((
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )],
        Json(exports),
    ))
}

/// Import report.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub imported: usize,
}

/// Import a previously exported coupon array.
///
/// POST /api/coupons/import
///
/// The whole batch is rejected on a malformed body, and inserted in one
/// transaction otherwise. Identities and timestamps are re-minted, so
/// importing the same file twice duplicates records.
#[instrument(skip(state, payload))]
pub async fn import(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    payload: std::result::Result<Json<Vec<CouponExport>>, JsonRejection>,
) -> Result<Json<ImportResponse>> {
    let Json(batch) =
        payload.map_err(|_| AppError::BadRequest("Invalid import file format".to_owned()))?;

    let new_coupons: Vec<NewCoupon> = batch.into_iter().map(Into::into).collect();
    let created = CouponRepository::new(state.pool())
        .create_many(&new_coupons)
        .await?;

    tracing::info!(imported = created.len(), "coupon import complete");
    Ok(Json(ImportResponse {
        success: true,
        imported: created.len(),
    }))
}
