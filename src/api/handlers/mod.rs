//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod links;

pub use auth::signup_handler;
pub use health::health_handler;
pub use links::{create_link_handler, list_links_handler};
