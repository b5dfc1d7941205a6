//! Repository trait for the mapping store.

use crate::domain::entities::{Mapping, NewMapping};
use crate::error::AppError;
use async_trait::async_trait;

/// Failure of a single insert attempt.
#[derive(Debug, thiserror::Error)]
pub enum InsertError {
    /// Another row already holds this short code.
    #[error("short code already taken: {0}")]
    CodeTaken(String),

    /// Any other store failure; propagated to the caller unchanged.
    #[error(transparent)]
    Store(#[from] AppError),
}

/// Persistent table of short-link mappings.
///
/// The store is the single source of truth for code uniqueness: `insert` must
/// reject a duplicate `code` with [`InsertError::CodeTaken`] and must never
/// leave a partial row visible to other callers.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryMappingRepository`] - in-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_mapping.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Finds the mapping owned by `owner_id` for exactly `destination_url`.
    ///
    /// If several rows match (possible after a lookup race), the oldest is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on store errors.
    async fn find_by_owner_and_url(
        &self,
        owner_id: i64,
        destination_url: &str,
    ) -> Result<Option<Mapping>, AppError>;

    /// Inserts a new mapping and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::CodeTaken`] on a code uniqueness violation and
    /// [`InsertError::Store`] on any other failure.
    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, InsertError>;

    /// Lists every mapping of `owner_id`, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on store errors.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Mapping>, AppError>;

    /// Returns true if the store answers a trivial query.
    async fn health_check(&self) -> bool;
}
