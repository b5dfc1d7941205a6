//! DTOs for self-registration.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{NewUser, Role, User};

/// Request to register a user account.
///
/// Any `role` sent by the client is ignored; new accounts always get `USER`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[serde(default, alias = "userName")]
    #[validate(length(
        min = 3,
        max = 30,
        message = "Username must be between 3 and 30 characters"
    ))]
    pub user_name: String,

    #[serde(default)]
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
}

impl From<SignUpRequest> for NewUser {
    fn from(req: SignUpRequest) -> Self {
        NewUser {
            user_name: req.user_name,
            email: req.email,
            roles: vec![Role::User],
        }
    }
}

/// The registered account, as returned to the client.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserCreatedResponse {
    pub id: i64,
    pub user_name: String,
    pub roles: Vec<String>,
}

impl From<User> for UserCreatedResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            roles: user.roles,
        }
    }
}

/// Response body for `POST /api/auth/signup`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub message: String,
    pub user: UserCreatedResponse,
}
