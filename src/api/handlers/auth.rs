//! Handler for self-registration.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::auth::{SignUpRequest, SignUpResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new account with the `USER` role.
///
/// # Endpoint
///
/// `POST /api/auth/signup` (no authentication)
///
/// # Request Body
///
/// ```json
/// { "user_name": "alice", "email": "alice@example.com" }
/// ```
///
/// # Errors
///
/// - 400 for a malformed name or email
/// - 409 `"Username exists"` or `"Email exists"`
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>), AppError> {
    payload.validate()?;

    let user = state.users.register(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            message: "Registration successfully".to_string(),
            user: user.into(),
        }),
    ))
}
