//! API route configuration.
//!
//! Link endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`]; registration is open.

use crate::api::handlers::{create_link_handler, list_links_handler, signup_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// API routes protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET  /links` - List the caller's short links
/// - `POST /links` - Allocate (or reuse) a short link
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/links", get(list_links_handler).post(create_link_handler))
}

/// API routes reachable without a token.
///
/// - `POST /auth/signup` - Register an account
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/auth/signup", post(signup_handler))
}
