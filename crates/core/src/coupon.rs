//! Coupon domain types and the catalog filter/sort vocabulary.
//!
//! `status` is author-set and never derived from `expiry_date`; the public
//! catalog computes expiry from the date on its own, so the two can disagree.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CouponId, LinkId};

/// Lowest accepted star rating.
pub const RATING_MIN: f64 = 0.0;
/// Highest accepted star rating.
pub const RATING_MAX: f64 = 5.0;

/// Author-set lifecycle status of a coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    #[default]
    Active,
    Expired,
    Upcoming,
}

impl std::fmt::Display for CouponStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Expired => write!(f, "expired"),
            Self::Upcoming => write!(f, "upcoming"),
        }
    }
}

impl std::str::FromStr for CouponStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "upcoming" => Ok(Self::Upcoming),
            _ => Err(format!("invalid coupon status: {s}")),
        }
    }
}

/// Fixed set of catalog categories.
///
/// Each category also names a gradient slot in the color settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponCategory {
    Electronics,
    Fashion,
    Food,
    Travel,
    Beauty,
    Gaming,
}

impl CouponCategory {
    /// All categories, in display order.
    pub const ALL: [Self; 6] = [
        Self::Electronics,
        Self::Fashion,
        Self::Food,
        Self::Travel,
        Self::Beauty,
        Self::Gaming,
    ];

    /// Stable lowercase key, used in URLs and as the gradient slot name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Fashion => "fashion",
            Self::Food => "food",
            Self::Travel => "travel",
            Self::Beauty => "beauty",
            Self::Gaming => "gaming",
        }
    }
}

impl std::fmt::Display for CouponCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CouponCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("invalid coupon category: {s}"))
    }
}

/// A coupon (domain type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    /// Store or brand the code belongs to.
    pub store: String,
    /// The discount code itself.
    pub code: String,
    pub description: String,
    /// Display string, e.g. "50% OFF" or "Free shipping".
    pub discount: String,
    pub category: CouponCategory,
    pub expiry_date: NaiveDate,
    /// Author-set status; see the module docs for the expiry drift.
    pub status: CouponStatus,
    pub featured: bool,
    pub verified: bool,
    pub last_verified: Option<DateTime<Utc>>,
    /// External store URL the unlock flow redirects to.
    pub redirect_url: Option<String>,
    pub image: Option<String>,
    /// Weak reference; the link may have been deleted since.
    pub content_locker_link_id: Option<LinkId>,
    pub rating: f64,
    pub used_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    /// Whether the coupon is past its expiry date.
    ///
    /// Computed from `expiry_date` only; `status` is not consulted and may
    /// say something else.
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }

    /// The code with everything after the first two characters hidden.
    #[must_use]
    pub fn masked_code(&self) -> String {
        mask_code(&self.code)
    }
}

/// Mask a code for display before unlock.
///
/// Keeps the first two characters and replaces the rest with bullets; codes
/// of two characters or fewer are fully masked.
#[must_use]
pub fn mask_code(code: &str) -> String {
    let total = code.chars().count();
    if total <= 2 {
        return "•".repeat(total);
    }
    code.chars()
        .enumerate()
        .map(|(i, c)| if i < 2 { c } else { '•' })
        .collect()
}

/// Clamp a rating into the accepted range.
#[must_use]
pub fn clamp_rating(rating: f64) -> f64 {
    rating.clamp(RATING_MIN, RATING_MAX)
}

/// Payload for creating a coupon.
///
/// Absent display fields take the catalog defaults: unverified, zero rating,
/// zero uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCoupon {
    pub store: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub discount: String,
    pub category: CouponCategory,
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub status: CouponStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub content_locker_link_id: Option<LinkId>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub used_count: Option<i32>,
}

impl NewCoupon {
    /// Effective rating: supplied value clamped to [0, 5], else 0.
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating.map_or(RATING_MIN, clamp_rating)
    }

    /// Effective use count: supplied value floored at 0, else 0.
    #[must_use]
    pub fn used_count(&self) -> i32 {
        self.used_count.map_or(0, |n| n.max(0))
    }
}

/// Partial update applied onto an existing coupon.
///
/// `None` fields are left untouched; the optional columns use a double
/// `Option` so "clear this field" and "leave it alone" stay distinct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCoupon {
    pub store: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub discount: Option<String>,
    pub category: Option<CouponCategory>,
    pub expiry_date: Option<NaiveDate>,
    pub status: Option<CouponStatus>,
    pub featured: Option<bool>,
    pub verified: Option<bool>,
    pub last_verified: Option<Option<DateTime<Utc>>>,
    pub redirect_url: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub content_locker_link_id: Option<Option<LinkId>>,
    pub rating: Option<f64>,
    pub used_count: Option<i32>,
}

/// Export/import shape: a coupon minus identity and timestamps.
///
/// Import re-mints `id`/`created_at`/`updated_at` through the create
/// contract, so re-importing the same file duplicates records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponExport {
    pub store: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub discount: String,
    pub category: CouponCategory,
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub status: CouponStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub content_locker_link_id: Option<LinkId>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub used_count: Option<i32>,
}

impl From<Coupon> for CouponExport {
    fn from(c: Coupon) -> Self {
        Self {
            store: c.store,
            code: c.code,
            description: c.description,
            discount: c.discount,
            category: c.category,
            expiry_date: c.expiry_date,
            status: c.status,
            featured: c.featured,
            verified: c.verified,
            redirect_url: c.redirect_url,
            image: c.image,
            content_locker_link_id: c.content_locker_link_id,
            rating: Some(c.rating),
            used_count: Some(c.used_count),
        }
    }
}

impl From<CouponExport> for NewCoupon {
    fn from(e: CouponExport) -> Self {
        Self {
            store: e.store,
            code: e.code,
            description: e.description,
            discount: e.discount,
            category: e.category,
            expiry_date: e.expiry_date,
            status: e.status,
            featured: e.featured,
            verified: e.verified,
            redirect_url: e.redirect_url,
            image: e.image,
            content_locker_link_id: e.content_locker_link_id,
            rating: e.rating,
            used_count: e.used_count,
        }
    }
}

/// Catalog list filter: everything, one status, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogFilter {
    #[default]
    All,
    Status(CouponStatus),
    Category(CouponCategory),
}

impl std::fmt::Display for CatalogFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Status(s) => write!(f, "{s}"),
            Self::Category(c) => write!(f, "{c}"),
        }
    }
}

impl std::str::FromStr for CatalogFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        if let Ok(status) = s.parse::<CouponStatus>() {
            return Ok(Self::Status(status));
        }
        if let Ok(category) = s.parse::<CouponCategory>() {
            return Ok(Self::Category(category));
        }
        Err(format!("invalid catalog filter: {s}"))
    }
}

/// Catalog sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Most recently created first.
    #[default]
    Newest,
    /// Soonest expiry date first.
    ExpiringSoon,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Newest => write!(f, "newest"),
            Self::ExpiringSoon => write!(f, "expiring_soon"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "expiring_soon" => Ok(Self::ExpiringSoon),
            _ => Err(format!("invalid sort order: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_coupon() -> Coupon {
        Coupon {
            id: CouponId::new(1),
            store: "TechWorld".to_owned(),
            code: "SAVE50NOW".to_owned(),
            description: "Half off everything".to_owned(),
            discount: "50% OFF".to_owned(),
            category: CouponCategory::Electronics,
            expiry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            status: CouponStatus::Active,
            featured: false,
            verified: true,
            last_verified: None,
            redirect_url: Some("https://techworld.example/deals".to_owned()),
            image: None,
            content_locker_link_id: None,
            rating: 4.5,
            used_count: 120,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            CouponStatus::Active,
            CouponStatus::Expired,
            CouponStatus::Upcoming,
        ] {
            assert_eq!(status.to_string().parse::<CouponStatus>().unwrap(), status);
        }
        assert!("bogus".parse::<CouponStatus>().is_err());
    }

    #[test]
    fn test_category_roundtrip() {
        for category in CouponCategory::ALL {
            assert_eq!(
                category.as_str().parse::<CouponCategory>().unwrap(),
                category
            );
        }
        assert!("vehicles".parse::<CouponCategory>().is_err());
    }

    #[test]
    fn test_is_expired_ignores_status() {
        // Author-set "active" with a past expiry date: the stored status and
        // the date-computed view disagree, and both are kept as-is.
        let coupon = sample_coupon();
        let after = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let before = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let on_the_day = coupon.expiry_date;

        assert_eq!(coupon.status, CouponStatus::Active);
        assert!(coupon.is_expired(after));
        assert!(!coupon.is_expired(before));
        assert!(!coupon.is_expired(on_the_day));
    }

    #[test]
    fn test_mask_code() {
        assert_eq!(mask_code("SAVE50NOW"), "SA•••••••");
        assert_eq!(mask_code("AB"), "••");
        assert_eq!(mask_code("X"), "•");
        assert_eq!(mask_code(""), "");
    }

    #[test]
    fn test_new_coupon_defaults() {
        let new = NewCoupon {
            store: "TechWorld".to_owned(),
            code: "SAVE50NOW".to_owned(),
            description: String::new(),
            discount: "50% OFF".to_owned(),
            category: CouponCategory::Electronics,
            expiry_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            status: CouponStatus::default(),
            featured: false,
            verified: false,
            redirect_url: None,
            image: None,
            content_locker_link_id: None,
            rating: None,
            used_count: None,
        };
        assert_eq!(new.rating(), 0.0);
        assert_eq!(new.used_count(), 0);
    }

    #[test]
    fn test_new_coupon_normalizes_out_of_range() {
        let mut new: NewCoupon = serde_json::from_value(serde_json::json!({
            "store": "TechWorld",
            "code": "SAVE50NOW",
            "discount": "50% OFF",
            "category": "electronics",
            "expiry_date": "2026-12-31",
            "rating": 9.5,
            "used_count": -3
        }))
        .unwrap();
        assert_eq!(new.rating(), RATING_MAX);
        assert_eq!(new.used_count(), 0);

        new.rating = Some(-2.0);
        assert_eq!(new.rating(), RATING_MIN);
    }

    #[test]
    fn test_export_strips_identity() {
        let coupon = sample_coupon();
        let export = CouponExport::from(coupon.clone());
        let json = serde_json::to_value(&export).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("id"));
        assert!(!object.contains_key("created_at"));
        assert!(!object.contains_key("updated_at"));

        // Round-trip into a create payload keeps the non-identity fields.
        let new: NewCoupon = export.into();
        assert_eq!(new.store, coupon.store);
        assert_eq!(new.code, coupon.code);
        assert_eq!(new.rating(), coupon.rating);
        assert_eq!(new.used_count(), coupon.used_count);
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<CatalogFilter>().unwrap(), CatalogFilter::All);
        assert_eq!(
            "expired".parse::<CatalogFilter>().unwrap(),
            CatalogFilter::Status(CouponStatus::Expired)
        );
        assert_eq!(
            "travel".parse::<CatalogFilter>().unwrap(),
            CatalogFilter::Category(CouponCategory::Travel)
        );
        assert!("everything".parse::<CatalogFilter>().is_err());
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("newest".parse::<SortOrder>().unwrap(), SortOrder::Newest);
        assert_eq!(
            "expiring_soon".parse::<SortOrder>().unwrap(),
            SortOrder::ExpiringSoon
        );
        assert!("oldest".parse::<SortOrder>().is_err());
    }
}
