//! Bearer-token authentication and token issuance.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::Identity;
use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const TOKEN_LEN: usize = 48;

/// Resolves a raw bearer token to the identity it belongs to.
///
/// The HTTP layer depends on this trait only, so tests can swap in a stub.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for unknown or revoked tokens.
    async fn authenticate(&self, token: &str) -> Result<Identity, AppError>;
}

/// Token-based identity provider.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
pub struct AuthService<R: TokenRepository> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - token repository for DB operations
    /// - `signing_secret` - HMAC key; must match the value used when tokens were created
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    pub fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Generates a token for `user_id`, stores its hash and returns the raw value.
    ///
    /// The raw token is not recoverable afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a token with `name` already exists.
    pub async fn issue_token(
        &self,
        user_id: i64,
        name: &str,
        raw_token: Option<String>,
    ) -> Result<(String, ApiToken), AppError> {
        let raw = raw_token.unwrap_or_else(generate_token);
        let token = self
            .repository
            .create_token(user_id, name, &self.hash_token(&raw))
            .await?;

        tracing::info!(user_id, token_id = token.id, "API token issued");
        Ok((raw, token))
    }
}

#[async_trait]
impl<R: TokenRepository> IdentityProvider for AuthService<R> {
    async fn authenticate(&self, token: &str) -> Result<Identity, AppError> {
        let token_hash = self.hash_token(token);

        let Some(identity) = self.repository.find_identity(&token_hash).await? else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        };

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            tracing::warn!(error = %e, "Failed to update token last_used_at");
        }

        Ok(identity)
    }
}

/// Generates a 48-character alphanumeric token.
pub fn generate_token() -> String {
    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..TOKEN_CHARSET.len());
            TOKEN_CHARSET[idx] as char
        })
        .collect()
}
