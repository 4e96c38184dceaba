//! Catalog home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use dealgrove_core::coupon::{CatalogFilter, Coupon, SortOrder};

use crate::db::CouponRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::services::SettingsService;
use crate::state::AppState;

use super::LayoutView;

/// Coupon display data for catalog cards.
pub struct CouponCardView {
    pub id: i64,
    pub store: String,
    pub masked_code: String,
    pub description: String,
    pub discount: String,
    /// Matches a `.gradient-*` class in the settings-driven stylesheet.
    pub category_key: String,
    pub expiry_display: String,
    pub is_expired: bool,
    pub verified: bool,
    pub rating_display: String,
    pub used_count: i32,
    pub image: Option<String>,
}

impl CouponCardView {
    /// Build the card view; expiry is computed from the date, independent of
    /// the author-set status.
    #[must_use]
    pub fn build(coupon: &Coupon, today: NaiveDate) -> Self {
        Self {
            id: coupon.id.as_i64(),
            store: coupon.store.clone(),
            masked_code: coupon.masked_code(),
            description: coupon.description.clone(),
            discount: coupon.discount.clone(),
            category_key: coupon.category.as_str().to_owned(),
            expiry_display: coupon.expiry_date.format("%b %d, %Y").to_string(),
            is_expired: coupon.is_expired(today),
            verified: coupon.verified,
            rating_display: format!("{:.1}", coupon.rating),
            used_count: coupon.used_count,
            image: coupon.image.clone(),
        }
    }
}

/// One entry in the category/status filter bar.
pub struct FilterTabView {
    pub key: String,
    pub label: String,
    pub selected: bool,
}

/// Catalog query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub filter: Option<String>,
    pub sort: Option<String>,
}

impl CatalogQuery {
    /// Parse the query vocabulary; unknown values are a client error rather
    /// than a silent fallback to "all".
    pub fn parsed(&self) -> Result<(CatalogFilter, SortOrder)> {
        let filter = match self.filter.as_deref() {
            None => CatalogFilter::All,
            Some(raw) => raw.parse().map_err(AppError::BadRequest)?,
        };
        let sort = match self.sort.as_deref() {
            None => SortOrder::default(),
            Some(raw) => raw.parse().map_err(AppError::BadRequest)?,
        };
        Ok((filter, sort))
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: LayoutView,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub featured_heading: String,
    pub catalog_heading: String,
    pub empty_state: String,
    pub featured: Vec<CouponCardView>,
    pub coupons: Vec<CouponCardView>,
    pub filter_tabs: Vec<FilterTabView>,
    pub current_sort: String,
}

/// Display the catalog home page.
///
/// GET /?filter=...&sort=...
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<HomeTemplate> {
    let (filter, sort) = query.parsed()?;

    let settings = SettingsService::new(state.pool()).effective().await?;
    let repo = CouponRepository::new(state.pool());
    let featured = repo.featured().await?;
    let coupons = repo.list(filter, sort).await?;

    let today = Utc::now().date_naive();
    let featured_cards = featured
        .iter()
        .map(|c| CouponCardView::build(c, today))
        .collect();
    let coupon_cards = coupons
        .iter()
        .map(|c| CouponCardView::build(c, today))
        .collect();

    Ok(HomeTemplate {
        hero_title: settings.text_content.hero_title.clone(),
        hero_subtitle: settings.text_content.hero_subtitle.clone(),
        featured_heading: settings.text_content.featured_heading.clone(),
        catalog_heading: settings.text_content.catalog_heading.clone(),
        empty_state: settings.text_content.empty_state.clone(),
        featured: featured_cards,
        coupons: coupon_cards,
        filter_tabs: filter_tabs(filter),
        current_sort: sort.to_string(),
        layout: LayoutView::from_settings(&settings),
    })
}

fn filter_tabs(selected: CatalogFilter) -> Vec<FilterTabView> {
    use dealgrove_core::coupon::CouponCategory;

    let mut tabs = vec![FilterTabView {
        key: "all".to_owned(),
        label: "All".to_owned(),
        selected: selected == CatalogFilter::All,
    }];
    for category in CouponCategory::ALL {
        tabs.push(FilterTabView {
            key: category.as_str().to_owned(),
            label: title_case(category.as_str()),
            selected: selected == CatalogFilter::Category(category),
        });
    }
    tabs
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}
