//! In-process mapping store.
//!
//! Holds rows in a mutex-guarded vector. Code uniqueness is checked and the
//! row appended under the same lock, so inserts are atomic with respect to
//! each other just like a unique constraint. Used by integration tests and
//! local experiments; nothing is persisted.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{InsertError, MappingRepository};
use crate::error::AppError;

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Mapping>,
    codes: HashSet<String>,
    next_id: i64,
}

/// Mapping store kept in memory.
#[derive(Debug, Default)]
pub struct MemoryMappingRepository {
    table: Mutex<Table>,
}

impl MemoryMappingRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        // A poisoned lock only means another test thread panicked mid-insert;
        // the table itself is never left half-written.
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl MappingRepository for MemoryMappingRepository {
    async fn find_by_owner_and_url(
        &self,
        owner_id: i64,
        destination_url: &str,
    ) -> Result<Option<Mapping>, AppError> {
        Ok(self
            .lock()
            .rows
            .iter()
            .find(|m| m.owner_id == owner_id && m.destination_url == destination_url)
            .cloned())
    }

    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, InsertError> {
        let mut table = self.lock();

        if table.codes.contains(&new_mapping.code) {
            return Err(InsertError::CodeTaken(new_mapping.code));
        }

        table.next_id += 1;
        let mapping = Mapping::new(
            table.next_id,
            new_mapping.owner_id,
            new_mapping.destination_url,
            new_mapping.code,
            0,
            new_mapping.created_at,
        );

        table.codes.insert(mapping.code.clone());
        table.rows.push(mapping.clone());

        Ok(mapping)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Mapping>, AppError> {
        let mut rows: Vec<Mapping> = self
            .lock()
            .rows
            .iter()
            .filter(|m| m.owner_id == owner_id)
            .cloned()
            .collect();

        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(rows)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
