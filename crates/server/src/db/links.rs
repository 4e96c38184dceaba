//! Content locker link repository.
//!
//! Coupons reference links weakly by id; deleting a link does not cascade or
//! repoint referencing coupons, so danglers are expected and tolerated.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dealgrove_core::link::{ContentLockerLink, NewLink, UpdateLink};
use dealgrove_core::types::LinkId;

use super::RepositoryError;

const COLUMNS: &str = "id, name, url, active, created_at";

#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    id: i64,
    name: String,
    url: String,
    active: bool,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for ContentLockerLink {
    fn from(row: LinkRow) -> Self {
        Self {
            id: LinkId::new(row.id),
            name: row.name,
            url: row.url,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

/// Repository for content locker link operations.
pub struct LinkRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LinkRepository<'a> {
    /// Create a new link repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all links, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<ContentLockerLink>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM content_locker_links ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, LinkRow>(&sql).fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a link by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: LinkId) -> Result<Option<ContentLockerLink>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM content_locker_links WHERE id = $1");
        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id.as_i64())
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Insert a new link.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewLink) -> Result<ContentLockerLink, RepositoryError> {
        let sql = format!(
            "INSERT INTO content_locker_links (name, url, active) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&new.name)
            .bind(&new.url)
            .bind(new.active)
            .fetch_one(self.pool)
            .await?;
        Ok(row.into())
    }

    /// Insert a batch of links in one transaction (all or nothing).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    pub async fn create_many(
        &self,
        batch: &[NewLink],
    ) -> Result<Vec<ContentLockerLink>, RepositoryError> {
        let sql = format!(
            "INSERT INTO content_locker_links (name, url, active) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(batch.len());
        for new in batch {
            let row = sqlx::query_as::<_, LinkRow>(&sql)
                .bind(&new.name)
                .bind(&new.url)
                .bind(new.active)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row.into());
        }
        tx.commit().await?;

        Ok(created)
    }

    /// Merge a partial update onto a link.
    ///
    /// Returns `Ok(None)` when the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: LinkId,
        update: &UpdateLink,
    ) -> Result<Option<ContentLockerLink>, RepositoryError> {
        let sql = format!(
            "UPDATE content_locker_links SET \
             name = COALESCE($2, name), \
             url = COALESCE($3, url), \
             active = COALESCE($4, active) \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id.as_i64())
            .bind(update.name.as_deref())
            .bind(update.url.as_deref())
            .bind(update.active)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Delete a link; zero rows affected is not an error, and referencing
    /// coupons are left pointing at the now-missing id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: LinkId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM content_locker_links WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Total link count for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM content_locker_links")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }
}
