//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give HTTP handlers and the admin
//! CLI a small API.
//!
//! # Available Services
//!
//! - [`services::link_allocator::LinkAllocator`] - Short link allocation and listing
//! - [`services::auth_service::AuthService`] - API token issuance and authentication

pub mod services;
