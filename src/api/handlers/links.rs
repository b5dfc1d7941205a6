//! Handlers for link endpoints (create, list).

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, CreateLinkResponse, LinkResponse};
use crate::domain::entities::{Identity, Role};
use crate::error::AppError;
use crate::state::AppState;

/// Allocates a short link for the caller, or returns the one they already have.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "actual_url": "https://example.com/some/long/path" }
/// ```
///
/// `actualUrl` is accepted as an alias.
///
/// # Response
///
/// **201 Created** in both cases. The message is `"Short URL created"` for a
/// new mapping and `"Short URL Already available"` when the caller already
/// owns a mapping for this exact URL; `link.already_exists` tells them apart.
///
/// # Errors
///
/// - 400 for a missing, malformed or non-http(s) URL
/// - 403 if the caller lacks the `USER` role
/// - 500 if no free code was found within the attempt budget
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    require_user(&identity)?;
    payload.validate()?;

    let allocation = state
        .allocator
        .allocate(&payload.actual_url, &identity)
        .await?;

    let message = if allocation.reused {
        "Short URL Already available"
    } else {
        "Short URL created"
    };

    let link = LinkResponse::from_mapping(
        &allocation.mapping,
        &state.short_base_url,
        &identity.display_name,
        allocation.reused,
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateLinkResponse {
            message: message.to_string(),
            link,
        }),
    ))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    require_user(&identity)?;

    let mappings = state.allocator.list_by_owner(&identity).await?;

    let links = mappings
        .iter()
        .map(|m| {
            LinkResponse::from_mapping(m, &state.short_base_url, &identity.display_name, false)
        })
        .collect();

    Ok(Json(links))
}

fn require_user(identity: &Identity) -> Result<(), AppError> {
    if identity.has_role(Role::User) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Forbidden",
            json!({ "required_role": Role::User.as_str() }),
        ))
    }
}
