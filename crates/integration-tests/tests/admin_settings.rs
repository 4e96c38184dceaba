//! Integration tests for admin settings and the dashboard.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p dealgrove-server)
//! - An admin account matching `DEALGROVE_ADMIN_EMAIL`/`DEALGROVE_ADMIN_PASSWORD`

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use dealgrove_integration_tests::{admin_credentials, base_url};

async fn authenticated_client() -> Client {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client");

    let (email, password) = admin_credentials();
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::OK, "admin login failed");

    client
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_effective_settings_are_fully_populated() {
    let client = authenticated_client().await;

    let settings: Value = client
        .get(format!("{}/api/settings", base_url()))
        .send()
        .await
        .expect("get settings failed")
        .json()
        .await
        .expect("settings body");

    // Whatever is stored, the effective object always carries every section.
    for section in ["nav_bar", "colors", "general", "seo", "text_content"] {
        assert!(settings[section].is_object(), "missing section {section}");
    }
    assert!(
        !settings["colors"]["gradient_presets"]
            .as_array()
            .expect("presets")
            .is_empty()
    );
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_color_patch_merges_over_existing() {
    let client = authenticated_client().await;

    let before: Value = client
        .get(format!("{}/api/settings", base_url()))
        .send()
        .await
        .expect("get settings failed")
        .json()
        .await
        .expect("body");
    let original_primary = before["colors"]["primary"].as_str().expect("primary").to_owned();
    let secondary = before["colors"]["secondary"].as_str().expect("secondary").to_owned();

    let patched: Value = client
        .patch(format!("{}/api/settings/colors", base_url()))
        .json(&json!({ "primary": "#123456" }))
        .send()
        .await
        .expect("patch failed")
        .json()
        .await
        .expect("body");

    // The patched key wins; everything the patch omitted is untouched.
    assert_eq!(patched["colors"]["primary"], "#123456");
    assert_eq!(patched["colors"]["secondary"], secondary.as_str());

    // The stylesheet reflects the change immediately.
    let css = client
        .get(format!("{}/theme.css", base_url()))
        .send()
        .await
        .expect("theme.css failed")
        .text()
        .await
        .expect("css body");
    assert!(css.contains("--color-primary: #123456;"));

    // Restore.
    let _ = client
        .patch(format!("{}/api/settings/colors", base_url()))
        .json(&json!({ "primary": original_primary }))
        .send()
        .await;
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_wrongly_typed_patch_is_rejected() {
    let client = authenticated_client().await;

    let resp = client
        .patch(format!("{}/api/settings/nav-bar", base_url()))
        .json(&json!({ "buttons": "not-a-list" }))
        .send()
        .await
        .expect("patch failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_theme_switch_roundtrip() {
    let client = authenticated_client().await;

    let before: Value = client
        .get(format!("{}/api/settings", base_url()))
        .send()
        .await
        .expect("get settings failed")
        .json()
        .await
        .expect("body");
    let original = before["theme"].as_str().expect("theme").to_owned();
    let flipped = if original == "dark" { "light" } else { "dark" };

    let after: Value = client
        .put(format!("{}/api/settings/theme", base_url()))
        .json(&json!({ "theme": flipped }))
        .send()
        .await
        .expect("set theme failed")
        .json()
        .await
        .expect("body");
    assert_eq!(after["theme"], flipped);

    // Restore.
    let _ = client
        .put(format!("{}/api/settings/theme", base_url()))
        .json(&json!({ "theme": original }))
        .send()
        .await;
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_dashboard_counts_are_consistent() {
    let client = authenticated_client().await;

    let stats: Value = client
        .get(format!("{}/api/dashboard", base_url()))
        .send()
        .await
        .expect("dashboard failed")
        .json()
        .await
        .expect("body");

    let total = stats["coupons"]["total"].as_i64().expect("total");
    let by_status = stats["coupons"]["active"].as_i64().expect("active")
        + stats["coupons"]["expired"].as_i64().expect("expired")
        + stats["coupons"]["upcoming"].as_i64().expect("upcoming");
    assert_eq!(total, by_status);
    assert!(stats["coupons"]["featured"].as_i64().expect("featured") <= total);
    assert!(stats["links"]["total"].as_i64().is_some());
}
