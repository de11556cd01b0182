//! Route definitions for the tripnote API

use axum::{routing::get, Router};

use crate::app_state::AppState;
use crate::handlers::{health_check, root};

mod auth;
mod review;

pub use auth::auth_routes;
pub use review::review_routes;

/// Every route of the API, with state attached.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(auth_routes(&state))
        .merge(review_routes(&state))
        .with_state(state)
}
