//! Tripnote backend library
//!
//! Registration, login and bearer-token authentication for the tripnote
//! travel-review API, plus the review resource itself.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
