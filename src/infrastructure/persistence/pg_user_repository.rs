//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::db_error::{
    USER_EMAIL_UNIQUE_CONSTRAINT, USER_NAME_UNIQUE_CONSTRAINT, violated_unique_constraint,
};

/// PostgreSQL repository for the `users` table.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    user_name: String,
    email: String,
    roles: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            user_name: r.user_name,
            email: r.email,
            roles: r.roles,
            created_at: r.created_at,
        }
    }
}

/// Maps a user-name or email unique violation to its specific conflict.
fn user_insert_error(e: sqlx::Error) -> AppError {
    let field = match violated_unique_constraint(&e) {
        Some(USER_NAME_UNIQUE_CONSTRAINT) => Some(("Username exists", "user_name")),
        Some(USER_EMAIL_UNIQUE_CONSTRAINT) => Some(("Email exists", "email")),
        _ => None,
    };

    match field {
        Some((message, field)) => AppError::conflict(message, json!({ "field": field })),
        None => AppError::from(e),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (user_name, email, roles)
            VALUES ($1, $2, $3)
            RETURNING id, user_name, email, roles, created_at
            "#,
        )
        .bind(&new_user.user_name)
        .bind(&new_user.email)
        .bind(new_user.role_names())
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(user_insert_error)?;

        Ok(row.into())
    }

    async fn find_by_name(&self, user_name: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, user_name, email, roles, created_at
            FROM users
            WHERE user_name = $1
            "#,
        )
        .bind(user_name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, user_name, email, roles, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(User::from))
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, user_name, email, roles, created_at
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
