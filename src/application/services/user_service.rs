//! User registration and lookup.

use std::sync::Arc;

use serde_json::json;
use validator::Validate;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// Service for registering and resolving users.
pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Registers a new user.
    ///
    /// The user name is checked before the email, so a request clashing on
    /// both reports `"Username exists"`. The store's unique constraints still
    /// decide a race between two registrations for the same name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the name or email is malformed.
    /// Returns [`AppError::Conflict`] if the name or email is taken.
    pub async fn register(&self, new_user: NewUser) -> Result<User, AppError> {
        new_user.validate()?;

        if self
            .repository
            .find_by_name(&new_user.user_name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Username exists",
                json!({ "field": "user_name" }),
            ));
        }

        if self
            .repository
            .find_by_email(&new_user.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Email exists", json!({ "field": "email" })));
        }

        let user = self.repository.create(new_user).await?;
        tracing::info!(user_id = user.id, user_name = %user.user_name, "User registered");

        Ok(user)
    }

    /// Returns the user with this exact name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no such user exists.
    pub async fn find_by_name(&self, user_name: &str) -> Result<User, AppError> {
        self.repository
            .find_by_name(user_name)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    format!("User not found with username: {user_name}"),
                    json!({ "user_name": user_name }),
                )
            })
    }
}
