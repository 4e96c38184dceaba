//! Integration tests for the public catalog and unlock flow.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p dealgrove-server)
//! - Seed data (cargo run -p dealgrove-cli -- seed)

use reqwest::{Client, StatusCode};
use serde_json::Value;

use dealgrove_integration_tests::base_url;

fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("health request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_home_renders_catalog() {
    let resp = client()
        .get(base_url())
        .send()
        .await
        .expect("home request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("body");
    assert!(body.contains("coupon-grid") || body.contains("empty-state"));
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_home_rejects_unknown_filter() {
    let resp = client()
        .get(format!("{}/?filter=everything", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_theme_css_carries_design_tokens() {
    let resp = client()
        .get(format!("{}/theme.css", base_url()))
        .send()
        .await
        .expect("theme.css request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("text/css"));

    let body = resp.text().await.expect("body");
    assert!(body.contains("--color-primary:"));
    assert!(body.contains("--color-primary-hsl:"));
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_unknown_coupon_is_404() {
    let resp = client()
        .get(format!("{}/coupons/999999999", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_unknown_unlock_token_is_404() {
    let resp = client()
        .get(format!(
            "{}/unlock/00000000-0000-0000-0000-000000000000",
            base_url()
        ))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running server and seed data"]
async fn test_unlock_flow_reaches_redirect() {
    let client = client();

    // Find an unexpired coupon id from the home page markup.
    let home = client
        .get(base_url())
        .send()
        .await
        .expect("home request failed")
        .text()
        .await
        .expect("body");
    let id = home
        .split("/coupons/")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .expect("no coupon link found on home page");

    let start: Value = client
        .post(format!("{}/coupons/{id}/unlock", base_url()))
        .send()
        .await
        .expect("start unlock failed")
        .json()
        .await
        .expect("start unlock body");
    let token = start["token"].as_str().expect("token").to_owned();
    let duration_ms = start["duration_ms"].as_u64().expect("duration");

    // Mid-flight the code must still be masked.
    let mid: Value = client
        .get(format!("{}/unlock/{token}", base_url()))
        .send()
        .await
        .expect("poll failed")
        .json()
        .await
        .expect("poll body");
    assert_eq!(mid["phase"], "unlocking");
    assert!(mid["code"].as_str().expect("code").contains('\u{2022}'));

    // Wait out the duration and the reveal grace period.
    tokio::time::sleep(std::time::Duration::from_millis(duration_ms + 2000)).await;

    let done: Value = client
        .get(format!("{}/unlock/{token}", base_url()))
        .send()
        .await
        .expect("poll failed")
        .json()
        .await
        .expect("poll body");
    assert_eq!(done["phase"], "redirect");
    assert!(!done["code"].as_str().expect("code").contains('\u{2022}'));
}
