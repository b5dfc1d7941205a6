//! Business logic services for the application layer.

pub mod auth_service;
pub mod link_allocator;
pub mod user_service;

pub use auth_service::{AuthService, IdentityProvider};
pub use link_allocator::{AllocatorConfig, LinkAllocator};
pub use user_service::UserService;
