//! Integration tests for DealGrove.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, migrate, and seed
//! cargo run -p dealgrove-cli -- migrate
//! cargo run -p dealgrove-cli -- admin create -e admin@dealgrove.test -p test-password
//! cargo run -p dealgrove-cli -- seed
//!
//! # Start the server, then run the ignored tests
//! cargo test -p dealgrove-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `DEALGROVE_BASE_URL` - server under test (default `http://localhost:3000`)
//! - `DEALGROVE_ADMIN_EMAIL` / `DEALGROVE_ADMIN_PASSWORD` - admin credentials
//!   (default `admin@dealgrove.test` / `test-password`)
//!
//! # Test Categories
//!
//! - `catalog` - Public catalog, theme stylesheet, and unlock flow
//! - `admin_coupons` - Coupon/link CRUD, bulk operations, import/export
//! - `admin_settings` - Settings merge, theme switch, dashboard

/// Base URL for the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("DEALGROVE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Admin credentials used by the guarded-API tests.
#[must_use]
pub fn admin_credentials() -> (String, String) {
    let email = std::env::var("DEALGROVE_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@dealgrove.test".to_owned());
    let password = std::env::var("DEALGROVE_ADMIN_PASSWORD")
        .unwrap_or_else(|_| "test-password".to_owned());
    (email, password)
}
