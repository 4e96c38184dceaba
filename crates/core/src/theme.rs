//! Color conversion and CSS design-token generation.
//!
//! Brand colors are authored as hex but consumed twice: as raw hex custom
//! properties, and as `H S% L%` triplets for the design-token system (which
//! derives hover/muted variants by adjusting lightness in CSS). The
//! `/theme.css` route renders both from the effective settings.

use serde::{Deserialize, Serialize};

use crate::coupon::CouponCategory;
use crate::settings::SiteSettings;

/// Errors parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexColorError {
    #[error("hex color must start with '#'")]
    MissingHash,
    #[error("hex color must have 3 or 6 digits, got {0}")]
    BadLength(usize),
    #[error("invalid hex digit in color")]
    BadDigit,
}

/// An RGB color parsed from hex notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// An HSL color rounded to integer degrees and percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsl {
    /// Hue in degrees, 0..360.
    pub h: u16,
    /// Saturation percent, 0..=100.
    pub s: u8,
    /// Lightness percent, 0..=100.
    pub l: u8,
}

impl std::fmt::Display for Hsl {
    /// Space-separated token form, e.g. `263 70% 58%`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}% {}%", self.h, self.s, self.l)
    }
}

/// Parse `#rgb` or `#rrggbb` into RGB channels.
///
/// # Errors
///
/// Returns [`HexColorError`] on a missing `#`, wrong digit count, or a
/// non-hex digit.
pub fn parse_hex(hex: &str) -> Result<Rgb, HexColorError> {
    let digits = hex.strip_prefix('#').ok_or(HexColorError::MissingHash)?;

    let expand = |d: &str| -> Result<u8, HexColorError> {
        u8::from_str_radix(d, 16).map_err(|_| HexColorError::BadDigit)
    };

    match digits.len() {
        3 => {
            let mut chars = digits.chars();
            let mut channel = || -> Result<u8, HexColorError> {
                let c = chars.next().ok_or(HexColorError::BadDigit)?;
                let v = expand(&c.to_string())?;
                Ok(v * 17)
            };
            Ok(Rgb {
                r: channel()?,
                g: channel()?,
                b: channel()?,
            })
        }
        6 => Ok(Rgb {
            r: expand(digits.get(0..2).ok_or(HexColorError::BadDigit)?)?,
            g: expand(digits.get(2..4).ok_or(HexColorError::BadDigit)?)?,
            b: expand(digits.get(4..6).ok_or(HexColorError::BadDigit)?)?,
        }),
        n => Err(HexColorError::BadLength(n)),
    }
}

/// Convert a hex color to HSL, rounded to integer degrees/percentages.
///
/// # Errors
///
/// Returns [`HexColorError`] if the hex string does not parse.
#[allow(
    clippy::many_single_char_names,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn hex_to_hsl(hex: &str) -> Result<Hsl, HexColorError> {
    let Rgb { r, g, b } = parse_hex(hex)?;
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let l_pct = (l * 100.0).round() as u8;

    if (max - min).abs() < f64::EPSILON {
        // Achromatic: no hue, no saturation.
        return Ok(Hsl { h: 0, s: 0, l: l_pct });
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    // Hue from the channel owning the max, with 60-degree sector offsets.
    let h = if (max - r).abs() < f64::EPSILON {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if (max - g).abs() < f64::EPSILON {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    } * 60.0;

    Ok(Hsl {
        h: (h.round() as u16) % 360,
        s: (s * 100.0).round() as u8,
        l: l_pct,
    })
}

/// Marker class for a selected UI gradient, derived from the preset name.
///
/// `"Sunset Pop"` becomes `ui-gradient-sunset-pop`.
#[must_use]
pub fn ui_gradient_class(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("ui-gradient-{}", slug.trim_matches('-'))
}

/// Render the design-token stylesheet for the given settings.
///
/// Emits each brand color as a raw hex custom property plus its HSL triplet,
/// the selected UI gradient, and one background class per category gradient.
/// Colors that fail to parse fall back to their raw form only.
#[must_use]
pub fn render_css(settings: &SiteSettings) -> String {
    let colors = &settings.colors;
    let mut css = String::from(":root {\n");

    for (token, hex) in [
        ("primary", colors.primary.as_str()),
        ("secondary", colors.secondary.as_str()),
        ("accent", colors.accent.as_str()),
    ] {
        css.push_str(&format!("  --color-{token}: {hex};\n"));
        if let Ok(hsl) = hex_to_hsl(hex) {
            css.push_str(&format!("  --color-{token}-hsl: {hsl};\n"));
        }
    }

    if let Some(gradient) = colors.preset_css(&colors.ui_gradient) {
        css.push_str(&format!("  --ui-gradient: {gradient};\n"));
    }
    css.push_str("}\n");

    let marker = ui_gradient_class(&colors.ui_gradient);
    css.push_str(&format!(
        ".{marker} {{ background-image: var(--ui-gradient); }}\n"
    ));

    for category in CouponCategory::ALL {
        let gradient = colors.category_gradient_css(category);
        if !gradient.is_empty() {
            css.push_str(&format!(
                ".gradient-{} {{ background-image: {gradient}; }}\n",
                category.as_str()
            ));
        }
    }

    css
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_long_form() {
        assert_eq!(
            parse_hex("#3b82f6").unwrap(),
            Rgb {
                r: 0x3b,
                g: 0x82,
                b: 0xf6
            }
        );
    }

    #[test]
    fn test_parse_hex_short_form() {
        assert_eq!(
            parse_hex("#f80").unwrap(),
            Rgb {
                r: 0xff,
                g: 0x88,
                b: 0x00
            }
        );
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert_eq!(parse_hex("3b82f6"), Err(HexColorError::MissingHash));
        assert_eq!(parse_hex("#3b82f"), Err(HexColorError::BadLength(5)));
        assert_eq!(parse_hex("#zzzzzz"), Err(HexColorError::BadDigit));
    }

    #[test]
    fn test_hex_to_hsl_known_values() {
        assert_eq!(hex_to_hsl("#ff0000").unwrap(), Hsl { h: 0, s: 100, l: 50 });
        assert_eq!(hex_to_hsl("#00ff00").unwrap(), Hsl { h: 120, s: 100, l: 50 });
        assert_eq!(hex_to_hsl("#0000ff").unwrap(), Hsl { h: 240, s: 100, l: 50 });
        assert_eq!(hex_to_hsl("#ffffff").unwrap(), Hsl { h: 0, s: 0, l: 100 });
        assert_eq!(hex_to_hsl("#000000").unwrap(), Hsl { h: 0, s: 0, l: 0 });
        assert_eq!(hex_to_hsl("#3b82f6").unwrap(), Hsl { h: 217, s: 91, l: 60 });
    }

    #[test]
    fn test_hsl_display() {
        let hsl = Hsl { h: 217, s: 91, l: 60 };
        assert_eq!(hsl.to_string(), "217 91% 60%");
    }

    #[test]
    fn test_ui_gradient_class() {
        assert_eq!(ui_gradient_class("dusk"), "ui-gradient-dusk");
        assert_eq!(ui_gradient_class("Sunset Pop"), "ui-gradient-sunset-pop");
    }

    #[test]
    fn test_render_css_contains_tokens() {
        let settings = SiteSettings::default();
        let css = render_css(&settings);
        assert!(css.contains("--color-primary: #7c3aed;"));
        assert!(css.contains("--color-primary-hsl:"));
        assert!(css.contains("--ui-gradient: linear-gradient"));
        assert!(css.contains(".ui-gradient-dusk"));
        assert!(css.contains(".gradient-electronics"));
    }

    #[test]
    fn test_render_css_survives_bad_hex() {
        let mut settings = SiteSettings::default();
        settings.colors.primary = "not-a-color".to_owned();
        let css = render_css(&settings);
        assert!(css.contains("--color-primary: not-a-color;"));
        assert!(!css.contains("--color-primary-hsl:"));
    }
}
