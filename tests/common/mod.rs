#![allow(dead_code)]

use async_trait::async_trait;
use qwiklink::application::services::{
    AllocatorConfig, IdentityProvider, LinkAllocator, UserService,
};
use qwiklink::domain::entities::{Identity, Role};
use qwiklink::domain::repositories::{MappingRepository, UserRepository};
use qwiklink::error::AppError;
use qwiklink::infrastructure::persistence::{MemoryMappingRepository, MemoryUserRepository};
use qwiklink::state::AppState;
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;

pub const USER_TOKEN: &str = "user-token";
pub const OTHER_USER_TOKEN: &str = "other-user-token";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const GUEST_TOKEN: &str = "guest-token";

pub const BASE_URL: &str = "http://localhost:3000";

/// Identity provider backed by a fixed token table.
pub struct StubIdentityProvider {
    tokens: HashMap<String, Identity>,
}

impl StubIdentityProvider {
    pub fn new() -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(
            USER_TOKEN.to_string(),
            Identity::new(1, "alice", vec![Role::User]),
        );
        tokens.insert(
            OTHER_USER_TOKEN.to_string(),
            Identity::new(2, "bob", vec![Role::User]),
        );
        tokens.insert(
            ADMIN_TOKEN.to_string(),
            Identity::new(3, "root", vec![Role::Admin]),
        );
        tokens.insert(GUEST_TOKEN.to_string(), Identity::new(4, "guest", vec![]));
        Self { tokens }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn authenticate(&self, token: &str) -> Result<Identity, AppError> {
        self.tokens.get(token).cloned().ok_or_else(|| {
            AppError::unauthorized("Unauthorized", json!({"reason": "Invalid or revoked token"}))
        })
    }
}

pub fn create_test_state(repo: Arc<dyn MappingRepository>) -> AppState {
    create_test_state_with_users(repo, Arc::new(MemoryUserRepository::new()))
}

pub fn create_test_state_with_users(
    repo: Arc<dyn MappingRepository>,
    users: Arc<dyn UserRepository>,
) -> AppState {
    let allocator = Arc::new(LinkAllocator::new(repo, AllocatorConfig::default()));
    let users = Arc::new(UserService::new(users));
    AppState::new(
        allocator,
        users,
        Arc::new(StubIdentityProvider::new()),
        BASE_URL,
    )
}

pub fn create_user_state() -> (AppState, Arc<MemoryUserRepository>) {
    let users = Arc::new(MemoryUserRepository::new());
    let state = create_test_state_with_users(Arc::new(MemoryMappingRepository::new()), users.clone());
    (state, users)
}

pub fn create_memory_state() -> (AppState, Arc<MemoryMappingRepository>) {
    let repo = Arc::new(MemoryMappingRepository::new());
    (create_test_state(repo.clone()), repo)
}

pub async fn create_test_user(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (user_name, email, roles) VALUES ($1, $2, ARRAY['USER']) RETURNING id",
    )
    .bind(name)
    .bind(format!("{name}@example.com"))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn count_mappings(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM link_mapping")
        .fetch_one(pool)
        .await
        .unwrap()
}
