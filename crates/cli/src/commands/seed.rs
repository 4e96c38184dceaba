//! Seed the database with sample catalog data.
//!
//! Intended for local development: a handful of coupons across categories,
//! a couple of locker links, and one coupon whose author-set status
//! disagrees with its expiry date (useful when eyeballing the admin/public
//! drift).

use chrono::{Duration, Utc};

use super::CliError;

struct SeedCoupon {
    store: &'static str,
    code: &'static str,
    description: &'static str,
    discount: &'static str,
    category: &'static str,
    expires_in_days: i64,
    status: &'static str,
    featured: bool,
    verified: bool,
    rating: f64,
    used_count: i32,
    redirect_url: Option<&'static str>,
    with_locker: bool,
}

const SEED_COUPONS: &[SeedCoupon] = &[
    SeedCoupon {
        store: "TechWorld",
        code: "SAVE50NOW",
        description: "Half off laptops and accessories.",
        discount: "50% OFF",
        category: "electronics",
        expires_in_days: 30,
        status: "active",
        featured: true,
        verified: true,
        rating: 4.5,
        used_count: 1240,
        redirect_url: Some("https://techworld.example/deals"),
        with_locker: true,
    },
    SeedCoupon {
        store: "Wardrobe & Co",
        code: "STYLE25",
        description: "25% off the new season collection.",
        discount: "25% OFF",
        category: "fashion",
        expires_in_days: 14,
        status: "active",
        featured: true,
        verified: false,
        rating: 4.0,
        used_count: 310,
        redirect_url: Some("https://wardrobe.example"),
        with_locker: false,
    },
    SeedCoupon {
        store: "SliceTown",
        code: "FREEPIZZA",
        description: "Buy one pizza, get one free.",
        discount: "BOGO",
        category: "food",
        expires_in_days: 7,
        status: "active",
        featured: false,
        verified: true,
        rating: 4.8,
        used_count: 2890,
        redirect_url: None,
        with_locker: false,
    },
    SeedCoupon {
        store: "Wanderlust Air",
        code: "FLYAWAY",
        description: "$40 off international flights.",
        discount: "$40 OFF",
        category: "travel",
        expires_in_days: 60,
        status: "upcoming",
        featured: false,
        verified: false,
        rating: 0.0,
        used_count: 0,
        redirect_url: Some("https://wanderlust.example/flights"),
        with_locker: false,
    },
    SeedCoupon {
        store: "GlowLab",
        code: "GLOW15",
        description: "15% off all skincare sets.",
        discount: "15% OFF",
        category: "beauty",
        expires_in_days: 21,
        status: "active",
        featured: true,
        verified: true,
        rating: 3.5,
        used_count: 97,
        redirect_url: Some("https://glowlab.example"),
        with_locker: true,
    },
    // Author-set "active" with a past expiry date: the admin list shows
    // Active while the public page computes Expired from the date.
    SeedCoupon {
        store: "PixelPlay",
        code: "GAMER10",
        description: "10% off digital game keys.",
        discount: "10% OFF",
        category: "gaming",
        expires_in_days: -3,
        status: "active",
        featured: false,
        verified: false,
        rating: 4.2,
        used_count: 512,
        redirect_url: Some("https://pixelplay.example"),
        with_locker: false,
    },
];

/// Insert the sample data.
///
/// Seeding is additive: running it twice duplicates the catalog, the same
/// way re-importing an export file does.
///
/// # Errors
///
/// Returns a database error if any insert fails.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    let locker_id: (i64,) = sqlx::query_as(
        "INSERT INTO content_locker_links (name, url, active) VALUES ($1, $2, TRUE) RETURNING id",
    )
    .bind("Quick survey")
    .bind("https://locker.example/survey")
    .fetch_one(&pool)
    .await?;

    sqlx::query("INSERT INTO content_locker_links (name, url, active) VALUES ($1, $2, FALSE)")
        .bind("Retired offer wall")
        .bind("https://locker.example/offers")
        .execute(&pool)
        .await?;

    let today = Utc::now().date_naive();
    for seed in SEED_COUPONS {
        let expiry = today + Duration::days(seed.expires_in_days);
        sqlx::query(
            "INSERT INTO coupons (store, code, description, discount, category, expiry_date, \
             status, featured, verified, redirect_url, content_locker_link_id, rating, used_count) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(seed.store)
        .bind(seed.code)
        .bind(seed.description)
        .bind(seed.discount)
        .bind(seed.category)
        .bind(expiry)
        .bind(seed.status)
        .bind(seed.featured)
        .bind(seed.verified)
        .bind(seed.redirect_url)
        .bind(seed.with_locker.then_some(locker_id.0))
        .bind(seed.rating)
        .bind(seed.used_count)
        .execute(&pool)
        .await?;
    }

    tracing::info!(
        coupons = SEED_COUPONS.len(),
        links = 2,
        "seed data inserted"
    );
    Ok(())
}
