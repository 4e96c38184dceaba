//! Coupon repository.
//!
//! Every write path is a single SQL round-trip; partial updates merge via
//! COALESCE so an empty update touches nothing but `updated_at`, which every
//! UPDATE bumps server-side. `created_at` is never written after insert.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use dealgrove_core::coupon::{
    CatalogFilter, Coupon, NewCoupon, SortOrder, UpdateCoupon, clamp_rating,
};
use dealgrove_core::types::{CouponId, LinkId};

use super::RepositoryError;

/// Explicit column list shared by every SELECT/RETURNING.
const COLUMNS: &str = "id, store, code, description, discount, category, expiry_date, status, \
     featured, verified, last_verified, redirect_url, image, content_locker_link_id, \
     rating, used_count, created_at, updated_at";

/// Shared SET clause for single and bulk updates ($1 is the id or id array).
const UPDATE_SET: &str = "store = COALESCE($2, store), \
     code = COALESCE($3, code), \
     description = COALESCE($4, description), \
     discount = COALESCE($5, discount), \
     category = COALESCE($6, category), \
     expiry_date = COALESCE($7, expiry_date), \
     status = COALESCE($8, status), \
     featured = COALESCE($9, featured), \
     verified = COALESCE($10, verified), \
     rating = COALESCE($11, rating), \
     used_count = COALESCE($12, used_count), \
     last_verified = CASE WHEN $13 THEN $14 ELSE last_verified END, \
     redirect_url = CASE WHEN $15 THEN $16 ELSE redirect_url END, \
     image = CASE WHEN $17 THEN $18 ELSE image END, \
     content_locker_link_id = CASE WHEN $19 THEN $20 ELSE content_locker_link_id END, \
     updated_at = NOW()";

/// Raw row as stored; mapped into the domain type on the way out.
#[derive(Debug, sqlx::FromRow)]
struct CouponRow {
    id: i64,
    store: String,
    code: String,
    description: String,
    discount: String,
    category: String,
    expiry_date: NaiveDate,
    status: String,
    featured: bool,
    verified: bool,
    last_verified: Option<DateTime<Utc>>,
    redirect_url: Option<String>,
    image: Option<String>,
    content_locker_link_id: Option<i64>,
    rating: f64,
    used_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CouponRow {
    fn into_domain(self) -> Result<Coupon, RepositoryError> {
        let status = self.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("coupon {}: {e}", self.id))
        })?;
        let category = self.category.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("coupon {}: {e}", self.id))
        })?;

        Ok(Coupon {
            id: CouponId::new(self.id),
            store: self.store,
            code: self.code,
            description: self.description,
            discount: self.discount,
            category,
            expiry_date: self.expiry_date,
            status,
            featured: self.featured,
            verified: self.verified,
            last_verified: self.last_verified,
            redirect_url: self.redirect_url,
            image: self.image,
            content_locker_link_id: self.content_locker_link_id.map(LinkId::new),
            rating: self.rating,
            used_count: self.used_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Catalog counts for the admin dashboard.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct CatalogCounts {
    pub total: i64,
    pub active: i64,
    pub expired: i64,
    pub upcoming: i64,
    pub featured: i64,
}

/// The ORDER BY clause for a sort order.
///
/// `newest` must yield non-increasing `created_at` and `expiring_soon`
/// non-decreasing `expiry_date`; ids break ties so pagination stays stable.
const fn order_clause(sort: SortOrder) -> &'static str {
    match sort {
        SortOrder::Newest => " ORDER BY created_at DESC, id DESC",
        SortOrder::ExpiringSoon => " ORDER BY expiry_date ASC, id ASC",
    }
}

/// Repository for coupon database operations.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    /// Create a new coupon repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List coupons matching a filter, in the given order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a stored status/category no longer parses.
    pub async fn list(
        &self,
        filter: CatalogFilter,
        sort: SortOrder,
    ) -> Result<Vec<Coupon>, RepositoryError> {
        let order = order_clause(sort);
        let rows = match filter {
            CatalogFilter::All => {
                let sql = format!("SELECT {COLUMNS} FROM coupons{order}");
                sqlx::query_as::<_, CouponRow>(&sql)
                    .fetch_all(self.pool)
                    .await?
            }
            CatalogFilter::Status(status) => {
                let sql = format!("SELECT {COLUMNS} FROM coupons WHERE status = $1{order}");
                sqlx::query_as::<_, CouponRow>(&sql)
                    .bind(status.to_string())
                    .fetch_all(self.pool)
                    .await?
            }
            CatalogFilter::Category(category) => {
                let sql = format!("SELECT {COLUMNS} FROM coupons WHERE category = $1{order}");
                sqlx::query_as::<_, CouponRow>(&sql)
                    .bind(category.as_str())
                    .fetch_all(self.pool)
                    .await?
            }
        };

        rows.into_iter().map(CouponRow::into_domain).collect()
    }

    /// The featured subset, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn featured(&self) -> Result<Vec<Coupon>, RepositoryError> {
        let sql =
            format!("SELECT {COLUMNS} FROM coupons WHERE featured ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, CouponRow>(&sql)
            .fetch_all(self.pool)
            .await?;
        rows.into_iter().map(CouponRow::into_domain).collect()
    }

    /// Get a coupon by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CouponId) -> Result<Option<Coupon>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM coupons WHERE id = $1");
        let row = sqlx::query_as::<_, CouponRow>(&sql)
            .bind(id.as_i64())
            .fetch_optional(self.pool)
            .await?;
        row.map(CouponRow::into_domain).transpose()
    }

    /// Insert a new coupon; identity and timestamps are minted server-side.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewCoupon) -> Result<Coupon, RepositoryError> {
        let sql = format!(
            "INSERT INTO coupons (store, code, description, discount, category, expiry_date, \
             status, featured, verified, redirect_url, image, content_locker_link_id, rating, \
             used_count) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        let row = bind_new_coupon(sqlx::query_as::<_, CouponRow>(&sql), new)
            .fetch_one(self.pool)
            .await?;
        row.into_domain()
    }

    /// Insert a batch of coupons in one transaction (all or nothing).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; no rows are
    /// kept in that case.
    pub async fn create_many(&self, batch: &[NewCoupon]) -> Result<Vec<Coupon>, RepositoryError> {
        let sql = format!(
            "INSERT INTO coupons (store, code, description, discount, category, expiry_date, \
             status, featured, verified, redirect_url, image, content_locker_link_id, rating, \
             used_count) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(batch.len());
        for new in batch {
            let row = bind_new_coupon(sqlx::query_as::<_, CouponRow>(&sql), new)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row.into_domain()?);
        }
        tx.commit().await?;

        Ok(created)
    }

    /// Merge a partial update onto a coupon; bumps `updated_at`.
    ///
    /// Returns `Ok(None)` when the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: CouponId,
        update: &UpdateCoupon,
    ) -> Result<Option<Coupon>, RepositoryError> {
        let sql = format!("UPDATE coupons SET {UPDATE_SET} WHERE id = $1 RETURNING {COLUMNS}");
        let row =
            bind_update_coupon_as(sqlx::query_as::<_, CouponRow>(&sql).bind(id.as_i64()), update)
                .fetch_optional(self.pool)
                .await?;
        row.map(CouponRow::into_domain).transpose()
    }

    /// Apply the same partial update to every matching id.
    ///
    /// Returns the number of rows touched; missing ids are skipped silently.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn bulk_update(
        &self,
        ids: &[CouponId],
        update: &UpdateCoupon,
    ) -> Result<u64, RepositoryError> {
        let id_values: Vec<i64> = ids.iter().map(|id| id.as_i64()).collect();
        let sql = format!("UPDATE coupons SET {UPDATE_SET} WHERE id = ANY($1)");
        let result = bind_update_coupon(sqlx::query(&sql).bind(id_values), update)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete a coupon; zero rows affected is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: CouponId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM coupons WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every matching id; zero rows affected is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn bulk_delete(&self, ids: &[CouponId]) -> Result<u64, RepositoryError> {
        let id_values: Vec<i64> = ids.iter().map(|id| id.as_i64()).collect();
        let result = sqlx::query("DELETE FROM coupons WHERE id = ANY($1)")
            .bind(id_values)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Bump the use counter when an unlock starts.
    ///
    /// Deliberately does not touch `updated_at`: usage is traffic, not an
    /// edit.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn increment_used(&self, id: CouponId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE coupons SET used_count = used_count + 1 WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Catalog counts for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn counts(&self) -> Result<CatalogCounts, RepositoryError> {
        let counts = sqlx::query_as::<_, CatalogCounts>(
            "SELECT COUNT(*) AS total, \
             COUNT(*) FILTER (WHERE status = 'active') AS active, \
             COUNT(*) FILTER (WHERE status = 'expired') AS expired, \
             COUNT(*) FILTER (WHERE status = 'upcoming') AS upcoming, \
             COUNT(*) FILTER (WHERE featured) AS featured \
             FROM coupons",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(counts)
    }
}

type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;
type PgQueryAs<'q, T> = sqlx::query::QueryAs<'q, sqlx::Postgres, T, sqlx::postgres::PgArguments>;

fn bind_new_coupon<'q>(query: PgQueryAs<'q, CouponRow>, new: &'q NewCoupon) -> PgQueryAs<'q, CouponRow> {
    query
        .bind(&new.store)
        .bind(&new.code)
        .bind(&new.description)
        .bind(&new.discount)
        .bind(new.category.as_str())
        .bind(new.expiry_date)
        .bind(new.status.to_string())
        .bind(new.featured)
        .bind(new.verified)
        .bind(new.redirect_url.as_deref())
        .bind(new.image.as_deref())
        .bind(new.content_locker_link_id.map(|l| l.as_i64()))
        .bind(new.rating())
        .bind(new.used_count())
}

/// Bind the UPDATE_SET parameters ($2..$20) in declaration order.
macro_rules! bind_update_fields {
    ($query:expr, $update:expr) => {{
        let u = $update;
        $query
            .bind(u.store.as_deref())
            .bind(u.code.as_deref())
            .bind(u.description.as_deref())
            .bind(u.discount.as_deref())
            .bind(u.category.map(|c| c.as_str()))
            .bind(u.expiry_date)
            .bind(u.status.map(|s| s.to_string()))
            .bind(u.featured)
            .bind(u.verified)
            .bind(u.rating.map(clamp_rating))
            .bind(u.used_count.map(|n| n.max(0)))
            .bind(u.last_verified.is_some())
            .bind(u.last_verified.flatten())
            .bind(u.redirect_url.is_some())
            .bind(u.redirect_url.clone().flatten())
            .bind(u.image.is_some())
            .bind(u.image.clone().flatten())
            .bind(u.content_locker_link_id.is_some())
            .bind(u.content_locker_link_id.flatten().map(|l| l.as_i64()))
    }};
}

fn bind_update_coupon<'q>(query: PgQuery<'q>, update: &'q UpdateCoupon) -> PgQuery<'q> {
    bind_update_fields!(query, update)
}

fn bind_update_coupon_as<'q>(
    query: PgQueryAs<'q, CouponRow>,
    update: &'q UpdateCoupon,
) -> PgQueryAs<'q, CouponRow> {
    bind_update_fields!(query, update)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_orders_by_created_at_descending() {
        assert_eq!(
            order_clause(SortOrder::Newest),
            " ORDER BY created_at DESC, id DESC"
        );
    }

    #[test]
    fn test_expiring_soon_orders_by_expiry_ascending() {
        assert_eq!(
            order_clause(SortOrder::ExpiringSoon),
            " ORDER BY expiry_date ASC, id ASC"
        );
    }

    #[test]
    fn test_update_set_only_ever_bumps_updated_at() {
        // The merge clause must never rewrite created_at, and must bump
        // updated_at unconditionally.
        assert!(!UPDATE_SET.contains("created_at"));
        assert!(UPDATE_SET.contains("updated_at = NOW()"));
    }
}
