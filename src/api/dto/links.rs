//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Mapping;

/// Request to allocate a short link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Destination URL. Scheme and syntax are checked by the allocator.
    #[serde(default, alias = "actualUrl")]
    #[validate(length(min = 1, message = "is required"))]
    pub actual_url: String,
}

/// A mapping as rendered to API clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub id: i64,
    pub original_url: String,
    pub short_url: String,
    pub click_count: i32,
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub already_exists: bool,
}

impl LinkResponse {
    pub fn from_mapping(
        mapping: &Mapping,
        base_url: &str,
        username: &str,
        already_exists: bool,
    ) -> Self {
        Self {
            id: mapping.id,
            original_url: mapping.destination_url.clone(),
            short_url: short_url(base_url, &mapping.code),
            click_count: mapping.click_count,
            created_at: mapping.created_at,
            username: username.to_string(),
            already_exists,
        }
    }
}

/// Response body for `POST /api/links`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLinkResponse {
    pub message: String,
    pub link: LinkResponse,
}

/// Appends `code` to `base_url`, dropping at most one trailing `/` from the base.
pub fn short_url(base_url: &str, code: &str) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    format!("{base}/{code}")
}
