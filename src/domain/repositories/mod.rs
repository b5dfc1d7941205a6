//! Repository trait definitions for the domain layer.
//!
//! Traits define the data-access contract; implementations live in
//! `crate::infrastructure::persistence`, and `mockall` generates mocks for
//! unit tests.
//!
//! # Available Repositories
//!
//! - [`MappingRepository`] - Short-link mappings (the allocator's store)
//! - [`TokenRepository`] - API token authentication
//! - [`UserRepository`] - Link owners
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod mapping_repository;
pub mod token_repository;
pub mod user_repository;

pub use mapping_repository::{InsertError, MappingRepository};
pub use token_repository::{ApiToken, TokenRepository};
pub use user_repository::UserRepository;

#[cfg(test)]
pub use mapping_repository::MockMappingRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
