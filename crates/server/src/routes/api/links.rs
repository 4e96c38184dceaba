//! Admin content locker link CRUD and import/export.
//!
//! No bulk variants here; the link collection stays small.

use axum::{
    Json,
    extract::{Path, State},
    extract::rejection::JsonRejection,
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use tracing::instrument;

use dealgrove_core::link::{ContentLockerLink, LinkExport, NewLink, UpdateLink};
use dealgrove_core::types::LinkId;

use crate::db::LinkRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

use super::coupons::{DeleteResponse, ImportResponse};

/// List all links.
///
/// GET /api/links
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Vec<ContentLockerLink>>> {
    let links = LinkRepository::new(state.pool()).list().await?;
    Ok(Json(links))
}

/// Get one link.
///
/// GET /api/links/{id}
pub async fn get_one(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i64>,
) -> Result<Json<ContentLockerLink>> {
    let link = LinkRepository::new(state.pool())
        .get(LinkId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Link not found".to_owned()))?;
    Ok(Json(link))
}

/// Create a link.
///
/// POST /api/links
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(body): Json<NewLink>,
) -> Result<(StatusCode, Json<ContentLockerLink>)> {
    let link = LinkRepository::new(state.pool()).create(&body).await?;
    tracing::info!(link_id = %link.id, name = %link.name, "locker link created");
    Ok((StatusCode::CREATED, Json(link)))
}

/// Merge a partial update onto a link.
///
/// PATCH /api/links/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateLink>,
) -> Result<Json<ContentLockerLink>> {
    let link = LinkRepository::new(state.pool())
        .update(LinkId::new(id), &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Link not found".to_owned()))?;
    Ok(Json(link))
}

/// Delete a link.
///
/// DELETE /api/links/{id}
///
/// Coupons referencing the link keep their now-dangling id; nothing
/// cascades or repoints.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>> {
    let deleted = LinkRepository::new(state.pool())
        .delete(LinkId::new(id))
        .await?;
    Ok(Json(DeleteResponse {
        success: true,
        deleted,
    }))
}

/// Export all links minus identity/timestamp fields.
///
/// GET /api/links/export
pub async fn export(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<impl IntoResponse> {
    let links = LinkRepository::new(state.pool()).list().await?;
    let exports: Vec<LinkExport> = links.into_iter().map(Into::into).collect();

    let filename = format!("links-export-{}.json", Utc::now().format("%Y%m%d-%H%M%S"));
    Ok((
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )],
        Json(exports),
    ))
}

/// Import a previously exported link array.
///
/// POST /api/links/import
#[instrument(skip(state, payload))]
pub async fn import(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    payload: std::result::Result<Json<Vec<LinkExport>>, JsonRejection>,
) -> Result<Json<ImportResponse>> {
    let Json(batch) =
        payload.map_err(|_| AppError::BadRequest("Invalid import file format".to_owned()))?;

    let new_links: Vec<NewLink> = batch.into_iter().map(Into::into).collect();
    let created = LinkRepository::new(state.pool())
        .create_many(&new_links)
        .await?;

    tracing::info!(imported = created.len(), "link import complete");
    Ok(Json(ImportResponse {
        success: true,
        imported: created.len(),
    }))
}
