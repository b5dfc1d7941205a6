//! Mapping entity: an allocated short code pointing at a destination URL.

use chrono::{DateTime, Utc};

/// A persisted short link owned by a single identity.
///
/// All fields except `click_count` are immutable once the row exists, and the
/// allocator never touches `click_count` either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub id: i64,
    pub owner_id: i64,
    pub destination_url: String,
    pub code: String,
    pub click_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Mapping {
    /// Creates a new Mapping instance.
    pub fn new(
        id: i64,
        owner_id: i64,
        destination_url: String,
        code: String,
        click_count: i32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            destination_url,
            code,
            click_count,
            created_at,
        }
    }
}

/// Input data for inserting a new mapping.
///
/// The store assigns `id` and starts `click_count` at zero.
#[derive(Debug, Clone)]
pub struct NewMapping {
    pub owner_id: i64,
    pub destination_url: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

/// Result of an allocation request.
#[derive(Debug, Clone)]
pub struct Allocation {
    pub mapping: Mapping,
    /// `true` when an existing mapping for the same owner and URL was returned.
    pub reused: bool,
}
