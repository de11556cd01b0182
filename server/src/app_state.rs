//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use mockable::Clock;
use sqlx::SqlitePool;

use crate::auth::{AuthService, PasswordError, PasswordHasher, TokenIssuer};
use crate::config::AppConfig;
use crate::services::ReviewService;
use crate::store::SqliteCredentialStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub review_service: Arc<ReviewService>,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>, review_service: Arc<ReviewService>) -> Self {
        Self {
            auth_service,
            review_service,
        }
    }

    /// Wire every service onto one SQLite pool.
    pub fn build(
        pool: SqlitePool,
        config: &AppConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PasswordError> {
        let store = Arc::new(SqliteCredentialStore::new(pool.clone()));
        let hasher = PasswordHasher::new(config.bcrypt_cost)?;
        let tokens = TokenIssuer::new(&config.jwt_secret, clock);

        Ok(Self::new(
            Arc::new(AuthService::new(store, hasher, tokens)),
            Arc::new(ReviewService::new(pool)),
        ))
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<ReviewService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.review_service.clone()
    }
}
