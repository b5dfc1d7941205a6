//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health` - Health check (public)
//! - `POST /api/auth/signup` - Registration (public)
//! - `/api/links`   - Link API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket
//! - **Authentication** - Bearer token on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api_routes(state.clone()).layer(rate_limit::api_layer());

    let public_router = Router::new()
        .route("/health", get(health_handler))
        .layer(rate_limit::public_layer());

    let router = Router::new()
        .merge(public_router)
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// API routes without rate limiting. Only the link routes require a token.
///
/// Exposed separately so tests can drive the handlers without a peer address.
pub fn api_routes(state: AppState) -> Router<AppState> {
    api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
        .merge(api::routes::public_routes())
}
