//! In-process user store, used by handler tests.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// User store kept in memory. Name and email uniqueness are checked under
/// the same lock as the insert.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Vec<User>> {
        self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.lock();

        if users.iter().any(|u| u.user_name == new_user.user_name) {
            return Err(AppError::conflict(
                "Username exists",
                json!({ "field": "user_name" }),
            ));
        }
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict("Email exists", json!({ "field": "email" })));
        }

        let user = User {
            id: users.len() as i64 + 1,
            roles: new_user.role_names(),
            user_name: new_user.user_name,
            email: new_user.email,
            created_at: Utc::now(),
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_by_name(&self, user_name: &str) -> Result<Option<User>, AppError> {
        Ok(self.lock().iter().find(|u| u.user_name == user_name).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.lock().iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.lock().clone())
    }
}
