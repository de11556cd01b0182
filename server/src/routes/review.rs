use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;
use crate::handlers::{create_review, list_reviews};
use crate::middleware::require_auth;

// Reviews are public to read; writing one needs a bearer token
pub fn review_routes(state: &AppState) -> Router<AppState> {
    let gate = middleware::from_fn_with_state(state.auth_service.clone(), require_auth);

    Router::new().route(
        "/reviews",
        get(list_reviews).merge(post(create_review).route_layer(gate)),
    )
}
