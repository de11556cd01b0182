//! Middleware for the tripnote API
//!
//! Bearer-token access gate for protected routes, request timeouts and
//! request tracing.

pub mod auth;
mod timeout;
mod trace;

pub use auth::{require_auth, AuthenticatedUser};
pub use timeout::request_timeout;
pub use trace::request_tracing;
