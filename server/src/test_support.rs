//! Shared fixtures for unit and integration tests.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use sqlx::SqlitePool;

use crate::app_state::AppState;
use crate::auth::{AuthService, PasswordHasher, TokenIssuer};
use crate::config::{DatabaseConfig, JwtSecret};
use crate::services::ReviewService;
use crate::store::{connect, migrate, CredentialStore, SqliteCredentialStore};

/// Cheapest work factor bcrypt accepts.
pub const TEST_BCRYPT_COST: u32 = 4;

pub const TEST_SECRET: &str = "test-secret-0123456789abcdef-0123456789";

/// Clock that only moves when told to
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// A clock pinned to 2024-06-01T12:00:00Z.
pub fn fixed_clock() -> Arc<MutableClock> {
    let start = match Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single() {
        Some(start) => start,
        None => panic!("valid fixture timestamp"),
    };
    Arc::new(MutableClock::new(start))
}

pub fn test_secret() -> JwtSecret {
    match JwtSecret::new(TEST_SECRET) {
        Ok(secret) => secret,
        Err(e) => panic!("test secret rejected: {e}"),
    }
}

/// Migrated in-memory database.
pub async fn memory_pool() -> SqlitePool {
    let pool = connect(&DatabaseConfig::new("sqlite::memory:"))
        .await
        .unwrap_or_else(|e| panic!("failed to open in-memory database: {e}"));
    migrate(&pool)
        .await
        .unwrap_or_else(|e| panic!("failed to migrate: {e}"));
    pool
}

pub async fn memory_store() -> Arc<SqliteCredentialStore> {
    Arc::new(SqliteCredentialStore::new(memory_pool().await))
}

/// Auth service plus a second issuer sharing its secret and clock, for
/// minting tokens that never went through `login`.
pub fn test_auth_service(
    store: Arc<dyn CredentialStore>,
    clock: Arc<MutableClock>,
) -> (AuthService, TokenIssuer) {
    let hasher = PasswordHasher::new(TEST_BCRYPT_COST)
        .unwrap_or_else(|e| panic!("failed to build hasher: {e}"));
    let service = AuthService::new(store, hasher, TokenIssuer::new(&test_secret(), clock.clone()));
    (service, TokenIssuer::new(&test_secret(), clock))
}

/// Full application state over a fresh in-memory database.
pub async fn test_state(clock: Arc<MutableClock>) -> AppState {
    let pool = memory_pool().await;
    let store = Arc::new(SqliteCredentialStore::new(pool.clone()));
    let (auth_service, _) = test_auth_service(store, clock);
    AppState::new(Arc::new(auth_service), Arc::new(ReviewService::new(pool)))
}
