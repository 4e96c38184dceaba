//! Site settings: the singleton appearance/copy configuration.
//!
//! Settings are stored as one row of JSON section blobs. The effective
//! configuration is always `defaults <- stored` per section: stored keys win,
//! keys the stored blob never mentions keep their default, and a section that
//! was never stored falls back to its default wholesale. This is what lets
//! old rows survive new fields being added to a section.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::coupon::CouponCategory;

/// One navigation button in the top bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavButton {
    pub label: String,
    pub href: String,
}

/// Branding and navigation chrome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavBarSettings {
    pub brand_name: String,
    pub brand_icon: Option<String>,
    pub buttons: Vec<NavButton>,
    pub show_particles: bool,
}

impl Default for NavBarSettings {
    fn default() -> Self {
        Self {
            brand_name: "DealGrove".to_owned(),
            brand_icon: None,
            buttons: vec![
                NavButton {
                    label: "Home".to_owned(),
                    href: "/".to_owned(),
                },
                NavButton {
                    label: "Categories".to_owned(),
                    href: "/#categories".to_owned(),
                },
            ],
            show_particles: true,
        }
    }
}

/// A named gradient available for categories and the global UI accent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientPreset {
    pub name: String,
    pub css: String,
}

/// Brand colors, category gradients, and the global UI gradient selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    /// Hex colors, `#rrggbb` or `#rgb`.
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    /// Gradient preset name per category key.
    pub category_gradients: Vec<CategoryGradient>,
    pub gradient_presets: Vec<GradientPreset>,
    /// Name of the preset driving the global UI accent gradient.
    pub ui_gradient: String,
}

/// Gradient assignment for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGradient {
    pub category: CouponCategory,
    pub gradient: String,
}

/// The fixed fallback preset list, restored whenever a merge leaves the
/// preset list empty.
#[must_use]
pub fn default_gradient_presets() -> Vec<GradientPreset> {
    [
        ("sunset", "linear-gradient(135deg, #f97316 0%, #ec4899 100%)"),
        ("ocean", "linear-gradient(135deg, #0ea5e9 0%, #6366f1 100%)"),
        ("forest", "linear-gradient(135deg, #22c55e 0%, #0d9488 100%)"),
        ("dusk", "linear-gradient(135deg, #7c3aed 0%, #db2777 100%)"),
        ("ember", "linear-gradient(135deg, #ef4444 0%, #f59e0b 100%)"),
    ]
    .into_iter()
    .map(|(name, css)| GradientPreset {
        name: name.to_owned(),
        css: css.to_owned(),
    })
    .collect()
}

impl Default for ColorSettings {
    fn default() -> Self {
        let category_gradients = CouponCategory::ALL
            .into_iter()
            .zip(["ocean", "dusk", "ember", "forest", "sunset", "dusk"])
            .map(|(category, gradient)| CategoryGradient {
                category,
                gradient: gradient.to_owned(),
            })
            .collect();

        Self {
            primary: "#7c3aed".to_owned(),
            secondary: "#0ea5e9".to_owned(),
            accent: "#f59e0b".to_owned(),
            category_gradients,
            gradient_presets: default_gradient_presets(),
            ui_gradient: "dusk".to_owned(),
        }
    }
}

impl ColorSettings {
    /// Gradient CSS for a category, falling back to the UI gradient.
    #[must_use]
    pub fn category_gradient_css(&self, category: CouponCategory) -> &str {
        let name = self
            .category_gradients
            .iter()
            .find(|g| g.category == category)
            .map_or(self.ui_gradient.as_str(), |g| g.gradient.as_str());
        self.preset_css(name).unwrap_or("")
    }

    /// CSS for a preset by name.
    #[must_use]
    pub fn preset_css(&self, name: &str) -> Option<&str> {
        self.gradient_presets
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.css.as_str())
    }
}

/// Free-form site copy not tied to a specific component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    pub site_description: String,
    pub footer_text: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            site_description: "Hand-checked discount codes for stores you actually shop at."
                .to_owned(),
            footer_text: "© DealGrove. All codes community-submitted.".to_owned(),
        }
    }
}

/// Document-level SEO metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoSettings {
    pub title: String,
    pub description: String,
    pub favicon: String,
}

impl Default for SeoSettings {
    fn default() -> Self {
        Self {
            title: "DealGrove | Coupon Codes & Deals".to_owned(),
            description: "Browse verified coupon codes with one-click unlock.".to_owned(),
            favicon: "/static/favicon.svg".to_owned(),
        }
    }
}

/// User-facing copy strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    pub hero_title: String,
    pub hero_subtitle: String,
    pub featured_heading: String,
    pub catalog_heading: String,
    pub unlock_button: String,
    pub copy_button: String,
    pub expired_badge: String,
    pub empty_state: String,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            hero_title: "Unlock today's best deals".to_owned(),
            hero_subtitle: "Fresh codes added daily, checked by real people.".to_owned(),
            featured_heading: "Featured deals".to_owned(),
            catalog_heading: "All coupons".to_owned(),
            unlock_button: "Unlock code".to_owned(),
            copy_button: "Copy code".to_owned(),
            expired_badge: "Expired".to_owned(),
            empty_state: "No coupons match that filter yet.".to_owned(),
        }
    }
}

/// Light or dark presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(format!("invalid theme: {s}")),
        }
    }
}

/// The full effective site configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiteSettings {
    pub nav_bar: NavBarSettings,
    pub colors: ColorSettings,
    pub general: GeneralSettings,
    pub seo: SeoSettings,
    pub text_content: TextContent,
    pub theme: Theme,
}

/// Section blobs as they come out of (or go into) the settings row.
///
/// `None` means the section was never stored.
#[derive(Debug, Clone, Default)]
pub struct StoredSections {
    pub nav_bar: Option<Value>,
    pub colors: Option<Value>,
    pub general: Option<Value>,
    pub seo: Option<Value>,
    pub text_content: Option<Value>,
    pub theme: Option<Theme>,
}

/// Which settings section a partial update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSection {
    NavBar,
    Colors,
    General,
    Seo,
    TextContent,
}

impl SiteSettings {
    /// Build the effective settings from stored section blobs.
    ///
    /// Each stored section is deep-merged over its defaults (stored keys
    /// win); an empty post-merge gradient preset list is repopulated from
    /// the fixed default list.
    #[must_use]
    pub fn effective(stored: &StoredSections) -> Self {
        let mut settings = Self {
            nav_bar: merge_over_default(stored.nav_bar.as_ref()),
            colors: merge_over_default(stored.colors.as_ref()),
            general: merge_over_default(stored.general.as_ref()),
            seo: merge_over_default(stored.seo.as_ref()),
            text_content: merge_over_default(stored.text_content.as_ref()),
            theme: stored.theme.unwrap_or_default(),
        };

        if settings.colors.gradient_presets.is_empty() {
            settings.colors.gradient_presets = default_gradient_presets();
        }

        settings
    }

    /// Apply a partial section patch and return the updated settings.
    ///
    /// The patch's keys win over the current section; keys it omits are left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the patched section no longer
    /// deserializes (wrongly-typed field values).
    pub fn with_section_patch(
        &self,
        section: SettingsSection,
        patch: &Value,
    ) -> Result<Self, serde_json::Error> {
        let mut updated = self.clone();
        match section {
            SettingsSection::NavBar => updated.nav_bar = patch_over(&self.nav_bar, patch)?,
            SettingsSection::Colors => updated.colors = patch_over(&self.colors, patch)?,
            SettingsSection::General => updated.general = patch_over(&self.general, patch)?,
            SettingsSection::Seo => updated.seo = patch_over(&self.seo, patch)?,
            SettingsSection::TextContent => {
                updated.text_content = patch_over(&self.text_content, patch)?;
            }
        }
        Ok(updated)
    }

    /// The stored representation of these settings.
    ///
    /// Sections are stored in full; the merge on load makes that choice
    /// invisible to readers.
    #[must_use]
    pub fn to_stored(&self) -> StoredSections {
        StoredSections {
            nav_bar: serde_json::to_value(&self.nav_bar).ok(),
            colors: serde_json::to_value(&self.colors).ok(),
            general: serde_json::to_value(&self.general).ok(),
            seo: serde_json::to_value(&self.seo).ok(),
            text_content: serde_json::to_value(&self.text_content).ok(),
            theme: Some(self.theme),
        }
    }
}

/// Deep-merge `overlay` onto `base`: object keys merge recursively, anything
/// else in `overlay` replaces the `base` value outright.
pub fn merge_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_value) => merge_values(base_value, overlay_value),
                    None => {
                        base_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => *base_slot = overlay_value.clone(),
    }
}

fn merge_over_default<T>(stored: Option<&Value>) -> T
where
    T: Serialize + DeserializeOwned + Default,
{
    let Some(stored) = stored else {
        return T::default();
    };
    let mut merged = match serde_json::to_value(T::default()) {
        Ok(v) => v,
        Err(_) => return T::default(),
    };
    merge_values(&mut merged, stored);
    serde_json::from_value(merged).unwrap_or_default()
}

fn patch_over<T>(current: &T, patch: &Value) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = serde_json::to_value(current)?;
    merge_values(&mut merged, patch);
    serde_json::from_value(merged)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_effective_defaults_when_nothing_stored() {
        let settings = SiteSettings::effective(&StoredSections::default());
        assert_eq!(settings, SiteSettings::default());
    }

    #[test]
    fn test_effective_merges_partial_section_over_defaults() {
        // A row holding only colors.primary: the stored primary wins, every
        // other field (including other colors) keeps its default.
        let stored = StoredSections {
            colors: Some(json!({ "primary": "#123456" })),
            ..StoredSections::default()
        };
        let settings = SiteSettings::effective(&stored);
        let defaults = ColorSettings::default();

        assert_eq!(settings.colors.primary, "#123456");
        assert_eq!(settings.colors.secondary, defaults.secondary);
        assert_eq!(settings.colors.accent, defaults.accent);
        assert_eq!(settings.colors.ui_gradient, defaults.ui_gradient);
        assert_eq!(settings.nav_bar, NavBarSettings::default());
        assert_eq!(settings.seo, SeoSettings::default());
    }

    #[test]
    fn test_effective_repopulates_empty_presets() {
        let stored = StoredSections {
            colors: Some(json!({ "gradient_presets": [] })),
            ..StoredSections::default()
        };
        let settings = SiteSettings::effective(&stored);
        assert_eq!(settings.colors.gradient_presets, default_gradient_presets());
    }

    #[test]
    fn test_effective_ignores_unknown_theme() {
        let stored = StoredSections {
            theme: None,
            ..StoredSections::default()
        };
        assert_eq!(SiteSettings::effective(&stored).theme, Theme::default());
    }

    #[test]
    fn test_section_patch_keeps_unmentioned_fields() {
        let settings = SiteSettings::default();
        let patched = settings
            .with_section_patch(SettingsSection::Seo, &json!({ "title": "New title" }))
            .unwrap();
        assert_eq!(patched.seo.title, "New title");
        assert_eq!(patched.seo.description, settings.seo.description);
        assert_eq!(patched.seo.favicon, settings.seo.favicon);
    }

    #[test]
    fn test_section_patch_rejects_wrong_types() {
        let settings = SiteSettings::default();
        let result =
            settings.with_section_patch(SettingsSection::NavBar, &json!({ "buttons": "nope" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_stored_roundtrip() {
        let mut settings = SiteSettings::default();
        settings.seo.title = "Custom".to_owned();
        settings.theme = Theme::Light;
        let back = SiteSettings::effective(&settings.to_stored());
        assert_eq!(back, settings);
    }

    #[test]
    fn test_category_gradient_lookup() {
        let colors = ColorSettings::default();
        let css = colors.category_gradient_css(CouponCategory::Electronics);
        assert!(css.contains("linear-gradient"));
        assert_eq!(colors.preset_css("does-not-exist"), None);
    }
}
