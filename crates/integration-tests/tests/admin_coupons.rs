//! Integration tests for admin coupon and link management.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p dealgrove-server)
//! - An admin account matching `DEALGROVE_ADMIN_EMAIL`/`DEALGROVE_ADMIN_PASSWORD`

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use dealgrove_integration_tests::{admin_credentials, base_url};

/// Create a client logged in as the test admin.
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

/// Create a throwaway coupon and return it.
async fn create_test_coupon(client: &Client, store: &str) -> Value {
    let resp = client
        .post(format!("{}/api/coupons", base_url()))
        .json(&json!({
            "store": store,
            "code": "ITESTCODE",
            "description": "integration test coupon",
            "discount": "10% OFF",
            "category": "electronics",
            "expiry_date": "2030-01-01"
        }))
        .send()
        .await
        .expect("create coupon failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("create coupon body")
}

async fn delete_coupon(client: &Client, id: i64) {
    let _ = client
        .delete(format!("{}/api/coupons/{id}", base_url()))
        .send()
        .await;
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_login_failure_is_generic() {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("client");

    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": "nobody@dealgrove.test", "password": "wrong" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_api_requires_session() {
    let client = Client::new();
    let resp = client
        .get(format!("{}/api/coupons", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_create_applies_defaults_and_clamps() {
    let client = authenticated_client().await;

    let resp = client
        .post(format!("{}/api/coupons", base_url()))
        .json(&json!({
            "store": "ClampCo",
            "code": "CLAMPED",
            "discount": "5% OFF",
            "category": "food",
            "expiry_date": "2030-06-01",
            "rating": 11.0,
            "used_count": -5
        }))
        .send()
        .await
        .expect("create failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let coupon: Value = resp.json().await.expect("body");
    assert_eq!(coupon["rating"], 5.0);
    assert_eq!(coupon["used_count"], 0);
    assert_eq!(coupon["verified"], false);
    assert_eq!(coupon["status"], "active");

    delete_coupon(&client, coupon["id"].as_i64().expect("id")).await;
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_empty_update_only_advances_updated_at() {
    let client = authenticated_client().await;
    let coupon = create_test_coupon(&client, "UpdateCo").await;
    let id = coupon["id"].as_i64().expect("id");

    let resp = client
        .patch(format!("{}/api/coupons/{id}", base_url()))
        .json(&json!({}))
        .send()
        .await
        .expect("update failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = resp.json().await.expect("body");
    for field in ["store", "code", "discount", "category", "expiry_date", "created_at"] {
        assert_eq!(updated[field], coupon[field], "field {field} changed");
    }
    assert!(
        updated["updated_at"].as_str().expect("updated_at")
            > coupon["updated_at"].as_str().expect("updated_at")
    );

    delete_coupon(&client, id).await;
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_update_missing_coupon_is_404() {
    let client = authenticated_client().await;
    let resp = client
        .patch(format!("{}/api/coupons/999999999", base_url()))
        .json(&json!({ "store": "Ghost" }))
        .send()
        .await
        .expect("update failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["error"], "Coupon not found");
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_delete_missing_coupon_still_succeeds() {
    let client = authenticated_client().await;
    let resp = client
        .delete(format!("{}/api/coupons/999999999", base_url()))
        .send()
        .await
        .expect("delete failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["success"], true);
    assert_eq!(body["deleted"], 0);
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_newest_sort_is_non_increasing() {
    let client = authenticated_client().await;

    let coupons: Vec<Value> = client
        .get(format!("{}/api/coupons?sort=newest", base_url()))
        .send()
        .await
        .expect("list failed")
        .json()
        .await
        .expect("body");

    let created: Vec<&str> = coupons
        .iter()
        .map(|c| c["created_at"].as_str().expect("created_at"))
        .collect();
    let mut sorted = created.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(created, sorted);
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_expiring_soon_sort_is_non_decreasing() {
    let client = authenticated_client().await;

    let coupons: Vec<Value> = client
        .get(format!("{}/api/coupons?sort=expiring_soon", base_url()))
        .send()
        .await
        .expect("list failed")
        .json()
        .await
        .expect("body");

    let expiries: Vec<&str> = coupons
        .iter()
        .map(|c| c["expiry_date"].as_str().expect("expiry_date"))
        .collect();
    let mut sorted = expiries.clone();
    sorted.sort_unstable();
    assert_eq!(expiries, sorted);
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_export_import_duplicates_records() {
    let client = authenticated_client().await;
    let coupon = create_test_coupon(&client, "ExportCo").await;
    let id = coupon["id"].as_i64().expect("id");

    let exported: Vec<Value> = client
        .get(format!("{}/api/coupons/export", base_url()))
        .send()
        .await
        .expect("export failed")
        .json()
        .await
        .expect("export body");
    assert!(exported.iter().all(|c| c.get("id").is_none()));
    assert!(exported.iter().all(|c| c.get("created_at").is_none()));

    let before: Vec<Value> = client
        .get(format!("{}/api/coupons", base_url()))
        .send()
        .await
        .expect("list failed")
        .json()
        .await
        .expect("body");

    let resp = client
        .post(format!("{}/api/coupons/import", base_url()))
        .json(&exported)
        .send()
        .await
        .expect("import failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let report: Value = resp.json().await.expect("import body");
    assert_eq!(report["imported"].as_u64(), Some(exported.len() as u64));

    // Import re-mints identities: every record now exists twice.
    let after: Vec<Value> = client
        .get(format!("{}/api/coupons", base_url()))
        .send()
        .await
        .expect("list failed")
        .json()
        .await
        .expect("body");
    assert_eq!(after.len(), before.len() + exported.len());

    // Cleanup: delete everything sharing the test store name.
    let ids: Vec<i64> = after
        .iter()
        .filter(|c| c["store"] == "ExportCo")
        .map(|c| c["id"].as_i64().expect("id"))
        .collect();
    let _ = client
        .post(format!("{}/api/coupons/bulk-delete", base_url()))
        .json(&json!({ "ids": ids }))
        .send()
        .await;
    delete_coupon(&client, id).await;
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_malformed_import_rejects_whole_batch() {
    let client = authenticated_client().await;

    let resp = client
        .post(format!("{}/api/coupons/import", base_url()))
        .header("content-type", "application/json")
        .body("{ not json ]")
        .send()
        .await
        .expect("import failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["error"], "Invalid import file format");
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_deleting_link_leaves_dangling_reference() {
    let client = authenticated_client().await;

    let link: Value = client
        .post(format!("{}/api/links", base_url()))
        .json(&json!({ "name": "Doomed locker", "url": "https://locker.example/doomed" }))
        .send()
        .await
        .expect("create link failed")
        .json()
        .await
        .expect("link body");
    let link_id = link["id"].as_i64().expect("link id");

    let coupon: Value = client
        .post(format!("{}/api/coupons", base_url()))
        .json(&json!({
            "store": "DanglerCo",
            "code": "DANGLE",
            "discount": "20% OFF",
            "category": "travel",
            "expiry_date": "2030-01-01",
            "content_locker_link_id": link_id
        }))
        .send()
        .await
        .expect("create coupon failed")
        .json()
        .await
        .expect("coupon body");
    let coupon_id = coupon["id"].as_i64().expect("id");

    let resp = client
        .delete(format!("{}/api/links/{link_id}", base_url()))
        .send()
        .await
        .expect("delete link failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // The coupon still points at the deleted link; nothing repairs it.
    let after: Value = client
        .get(format!("{}/api/coupons/{coupon_id}", base_url()))
        .send()
        .await
        .expect("get coupon failed")
        .json()
        .await
        .expect("coupon body");
    assert_eq!(after["content_locker_link_id"].as_i64(), Some(link_id));

    delete_coupon(&client, coupon_id).await;
}

#[tokio::test]
#[ignore = "Requires a running server and admin account"]
async fn test_bulk_update_touches_every_listed_id() {
    let client = authenticated_client().await;
    let first = create_test_coupon(&client, "BulkCo").await;
    let second = create_test_coupon(&client, "BulkCo").await;
    let ids = [
        first["id"].as_i64().expect("id"),
        second["id"].as_i64().expect("id"),
    ];

    let resp = client
        .post(format!("{}/api/coupons/bulk-update", base_url()))
        .json(&json!({ "ids": ids, "fields": { "featured": true } }))
        .send()
        .await
        .expect("bulk update failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["updated"], 2);

    for id in ids {
        delete_coupon(&client, id).await;
    }
}
