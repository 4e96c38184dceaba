//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Instant;

use moka::future::Cache;
use sqlx::PgPool;
use uuid::Uuid;

use dealgrove_core::CouponId;
use dealgrove_core::unlock::UnlockConfig;

use crate::config::ServerConfig;

/// An unlock in progress, keyed by its opaque token.
///
/// Carries everything the poll endpoint needs so it never has to touch the
/// database again; the coupon row may even change mid-unlock without
/// affecting a flow already running.
#[derive(Debug, Clone)]
pub struct UnlockSession {
    pub coupon_id: CouponId,
    pub code: String,
    pub redirect_url: Option<String>,
    pub started_at: Instant,
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    unlocks: Cache<Uuid, UnlockSession>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let unlocks = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(config.unlock.token_ttl())
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                unlocks,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the unlock session cache.
    #[must_use]
    pub fn unlocks(&self) -> &Cache<Uuid, UnlockSession> {
        &self.inner.unlocks
    }

    /// Unlock flow timing configuration.
    #[must_use]
    pub fn unlock_config(&self) -> &UnlockConfig {
        &self.inner.config.unlock
    }
}
