//! User entity: the owner of short links and API tokens.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use validator::Validate;

use super::identity::{Identity, Role};

static USER_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap());

/// A registered user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns the identity this user authenticates as.
    pub fn identity(&self) -> Identity {
        Identity::from_role_names(self.id, self.user_name.clone(), &self.roles)
    }
}

/// Input data for creating a user.
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(
        length(min = 3, max = 30, message = "must be between 3 and 30 characters"),
        regex(
            path = *USER_NAME_REGEX,
            message = "may only contain letters, digits, '_', '.' and '-'"
        )
    )]
    pub user_name: String,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    pub roles: Vec<Role>,
}

impl NewUser {
    /// Role names as stored in the `users.roles` column.
    pub fn role_names(&self) -> Vec<String> {
        if self.roles.is_empty() {
            return vec![Role::User.to_string()];
        }
        self.roles.iter().map(|r| r.to_string()).collect()
    }
}
