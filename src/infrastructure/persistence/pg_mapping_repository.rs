//! PostgreSQL implementation of the mapping store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{InsertError, MappingRepository};
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_code;

/// PostgreSQL repository over the `link_mapping` table.
///
/// Code uniqueness is enforced by the `link_mapping_short_link_key` constraint;
/// each insert is a single statement, so a failed attempt leaves no row behind.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct MappingRow {
    id: i64,
    user_id: i64,
    actual_link: String,
    short_link: String,
    click_count: i32,
    created_at: DateTime<Utc>,
}

impl From<MappingRow> for Mapping {
    fn from(r: MappingRow) -> Self {
        Mapping::new(
            r.id,
            r.user_id,
            r.actual_link,
            r.short_link,
            r.click_count,
            r.created_at,
        )
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn find_by_owner_and_url(
        &self,
        owner_id: i64,
        destination_url: &str,
    ) -> Result<Option<Mapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, user_id, actual_link, short_link, click_count, created_at
            FROM link_mapping
            WHERE user_id = $1 AND actual_link = $2
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(owner_id)
        .bind(destination_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Mapping::from))
    }

    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, InsertError> {
        let result = sqlx::query_as::<_, MappingRow>(
            r#"
            INSERT INTO link_mapping (user_id, actual_link, short_link, click_count, created_at)
            VALUES ($1, $2, $3, 0, $4)
            RETURNING id, user_id, actual_link, short_link, click_count, created_at
            "#,
        )
        .bind(new_mapping.owner_id)
        .bind(&new_mapping.destination_url)
        .bind(&new_mapping.code)
        .bind(new_mapping.created_at)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) if is_unique_violation_on_code(&e) => {
                Err(InsertError::CodeTaken(new_mapping.code))
            }
            Err(e) => Err(InsertError::Store(e.into())),
        }
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Mapping>, AppError> {
        let rows = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, user_id, actual_link, short_link, click_count, created_at
            FROM link_mapping
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Mapping::from).collect())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
