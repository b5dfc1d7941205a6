//! Repository implementations.
//!
//! - [`PgMappingRepository`] - short-link mappings in PostgreSQL
//! - [`PgTokenRepository`] - API token storage and validation
//! - [`PgUserRepository`] - user accounts
//! - [`MemoryMappingRepository`] - in-process mapping store for tests
//! - [`MemoryUserRepository`] - in-process user store for tests

pub mod memory_mapping_repository;
pub mod memory_user_repository;
pub mod pg_mapping_repository;
pub mod pg_token_repository;
pub mod pg_user_repository;

pub use memory_mapping_repository::MemoryMappingRepository;
pub use memory_user_repository::MemoryUserRepository;
pub use pg_mapping_repository::PgMappingRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;
