//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{IdentityProvider, LinkAllocator, UserService};
use crate::domain::repositories::{MappingRepository, UserRepository};

/// Handles to the services behind the HTTP layer.
///
/// Services are held over trait objects so the same router runs over
/// PostgreSQL in production and in-memory stores in tests.
#[derive(Clone)]
pub struct AppState {
    pub allocator: Arc<LinkAllocator<dyn MappingRepository>>,
    pub users: Arc<UserService<dyn UserRepository>>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    /// Prefix that short codes are appended to in responses.
    pub short_base_url: String,
}

impl AppState {
    pub fn new(
        allocator: Arc<LinkAllocator<dyn MappingRepository>>,
        users: Arc<UserService<dyn UserRepository>>,
        identity_provider: Arc<dyn IdentityProvider>,
        short_base_url: impl Into<String>,
    ) -> Self {
        Self {
            allocator,
            users,
            identity_provider,
            short_base_url: short_base_url.into(),
        }
    }
}
