//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Authenticates requests using Bearer tokens from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// On success the resolved [`crate::domain::entities::Identity`] is inserted
/// into the request extensions for handlers to extract with
/// `Extension<Identity>`.
///
/// # Errors
///
/// Returns `401 Unauthorized` (with `WWW-Authenticate: Bearer`) if the header
/// is missing or malformed, or the token is unknown or revoked.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let identity = st.identity_provider.authenticate(&token).await?;
    tracing::debug!(user_id = identity.id, "Request authenticated");

    parts.extensions.insert(identity);
    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}
