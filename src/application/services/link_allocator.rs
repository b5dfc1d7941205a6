//! Short-link allocation: validation, idempotent reuse and collision retry.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::domain::entities::{Allocation, Identity, Mapping, NewMapping};
use crate::domain::repositories::{InsertError, MappingRepository};
use crate::error::AppError;
use crate::utils::code_generator::{BASE62_ALPHABET, DEFAULT_CODE_LENGTH, generate_code};
use crate::utils::url_normalizer::{UrlNormalizationError, normalize_url};

/// Default number of insert attempts per allocation.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;

/// Message returned when every attempt collided. Deliberately says nothing
/// about the retry budget.
const EXHAUSTED_MESSAGE: &str = "Could not generate a unique short URL. Please try again.";

/// Tunables for [`LinkAllocator`], fixed at construction.
#[derive(Debug, Clone)]
pub struct AllocatorConfig {
    pub code_length: usize,
    pub alphabet: String,
    pub max_attempts: u32,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            alphabet: BASE62_ALPHABET.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Allocates short codes for (owner, URL) pairs.
///
/// The allocator holds no mutable state; one instance is shared by every
/// request. Code uniqueness is left entirely to the store: each attempt is a
/// plain insert, and a [`InsertError::CodeTaken`] answer triggers a new code.
/// Checking for the code before inserting would race with concurrent writers.
///
/// The per-owner lookup that makes allocation idempotent is best effort. Two
/// identical requests racing past the lookup can both insert, leaving two codes
/// for the same owner and URL.
pub struct LinkAllocator<R: MappingRepository + ?Sized> {
    repository: Arc<R>,
    config: AllocatorConfig,
}

impl<R: MappingRepository + ?Sized> LinkAllocator<R> {
    /// Creates a new allocator over `repository`.
    pub fn new(repository: Arc<R>, config: AllocatorConfig) -> Self {
        Self { repository, config }
    }

    /// Returns the mapping for `raw_url` owned by `owner`, creating it if needed.
    ///
    /// # Flow
    ///
    /// 1. Trim and validate the URL (http/https only)
    /// 2. Return the owner's existing mapping for that exact URL, if any
    /// 3. Otherwise insert with a fresh random code, retrying on code
    ///    collisions up to `max_attempts` times in total
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed or non-http(s) URL.
    /// Returns [`AppError::AllocationExhausted`] if every attempt collided.
    /// Store failures other than collisions are returned immediately, unretried.
    pub async fn allocate(&self, raw_url: &str, owner: &Identity) -> Result<Allocation, AppError> {
        let destination_url = normalize_url(raw_url).map_err(validation_error)?;

        if let Some(existing) = self
            .repository
            .find_by_owner_and_url(owner.id, &destination_url)
            .await?
        {
            tracing::debug!(owner_id = owner.id, code = %existing.code, "Reusing existing mapping");
            metrics::counter!("links_reused_total").increment(1);
            return Ok(Allocation {
                mapping: existing,
                reused: true,
            });
        }

        for attempt in 1..=self.config.max_attempts {
            let new_mapping = NewMapping {
                owner_id: owner.id,
                destination_url: destination_url.clone(),
                code: self.generate_code(),
                created_at: Utc::now(),
            };

            match self.repository.insert(new_mapping).await {
                Ok(mapping) => {
                    tracing::info!(
                        owner_id = owner.id,
                        code = %mapping.code,
                        attempt,
                        "Short link created"
                    );
                    metrics::counter!("links_created_total").increment(1);
                    return Ok(Allocation {
                        mapping,
                        reused: false,
                    });
                }
                Err(InsertError::CodeTaken(code)) => {
                    tracing::debug!(owner_id = owner.id, %code, attempt, "Short code collision");
                    metrics::counter!("link_code_collisions_total").increment(1);
                }
                Err(InsertError::Store(e)) => return Err(e),
            }
        }

        tracing::warn!(
            owner_id = owner.id,
            attempts = self.config.max_attempts,
            "Short code allocation exhausted"
        );
        metrics::counter!("link_allocation_exhausted_total").increment(1);

        Err(AppError::allocation_exhausted(EXHAUSTED_MESSAGE))
    }

    /// Lists every mapping owned by `owner`, most recent first.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub async fn list_by_owner(&self, owner: &Identity) -> Result<Vec<Mapping>, AppError> {
        self.repository.list_by_owner(owner.id).await
    }

    /// Returns true if the underlying store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.repository.health_check().await
    }

    fn generate_code(&self) -> String {
        generate_code(self.config.code_length, self.config.alphabet.as_bytes())
    }
}

fn validation_error(e: UrlNormalizationError) -> AppError {
    let details = match &e {
        UrlNormalizationError::InvalidFormat(reason) => {
            json!({ "field": "actual_url", "reason": reason })
        }
        UrlNormalizationError::UnsupportedProtocol => json!({ "field": "actual_url" }),
    };
    AppError::bad_request(e.to_string(), details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;
    use crate::domain::repositories::MockMappingRepository;
    use mockall::Sequence;
    use std::sync::Mutex;

    fn owner() -> Identity {
        Identity::new(42, "alice", vec![Role::User])
    }

    fn stored(new_mapping: &NewMapping, id: i64) -> Mapping {
        Mapping::new(
            id,
            new_mapping.owner_id,
            new_mapping.destination_url.clone(),
            new_mapping.code.clone(),
            0,
            new_mapping.created_at,
        )
    }

    fn allocator(repo: MockMappingRepository) -> LinkAllocator<MockMappingRepository> {
        LinkAllocator::new(Arc::new(repo), AllocatorConfig::default())
    }

    #[tokio::test]
    async fn test_allocate_creates_new_mapping() {
        let mut repo = MockMappingRepository::new();

        repo.expect_find_by_owner_and_url()
            .withf(|owner_id, url| *owner_id == 42 && url == "https://example.com/a")
            .times(1)
            .returning(|_, _| Ok(None));

        repo.expect_insert()
            .withf(|m| {
                m.owner_id == 42
                    && m.destination_url == "https://example.com/a"
                    && m.code.len() == 8
                    && m.code.chars().all(|c| BASE62_ALPHABET.contains(c))
            })
            .times(1)
            .returning(|m| Ok(stored(&m, 1)));

        let allocation = allocator(repo)
            .allocate("  https://example.com/a ", &owner())
            .await
            .unwrap();

        assert!(!allocation.reused);
        assert_eq!(allocation.mapping.id, 1);
        assert_eq!(allocation.mapping.click_count, 0);
        assert_eq!(allocation.mapping.destination_url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_allocate_reuses_existing_mapping() {
        let mut repo = MockMappingRepository::new();

        let existing = Mapping::new(
            5,
            42,
            "https://example.com".to_string(),
            "existing".to_string(),
            3,
            Utc::now(),
        );
        repo.expect_find_by_owner_and_url()
            .times(1)
            .returning(move |_, _| Ok(Some(existing.clone())));

        repo.expect_insert().times(0);

        let allocation = allocator(repo)
            .allocate("https://example.com", &owner())
            .await
            .unwrap();

        assert!(allocation.reused);
        assert_eq!(allocation.mapping.id, 5);
        assert_eq!(allocation.mapping.code, "existing");
    }

    #[tokio::test]
    async fn test_allocate_rejects_invalid_urls_before_store() {
        for input in ["ftp://example.com", "not a url", ""] {
            let mut repo = MockMappingRepository::new();
            repo.expect_find_by_owner_and_url().times(0);
            repo.expect_insert().times(0);

            let result = allocator(repo).allocate(input, &owner()).await;

            assert!(
                matches!(result, Err(AppError::Validation { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_allocate_unsupported_scheme_message() {
        let repo = MockMappingRepository::new();

        let err = allocator(repo)
            .allocate("ftp://example.com", &owner())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "URL must start with http:// or https://");
    }

    #[tokio::test]
    async fn test_allocate_retries_after_collisions() {
        let mut repo = MockMappingRepository::new();
        let mut seq = Sequence::new();

        repo.expect_find_by_owner_and_url()
            .times(1)
            .returning(|_, _| Ok(None));

        repo.expect_insert()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|m| Err(InsertError::CodeTaken(m.code)));

        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|m| Ok(stored(&m, 11)));

        let allocation = allocator(repo)
            .allocate("https://x.com", &owner())
            .await
            .unwrap();

        assert!(!allocation.reused);
        assert_eq!(allocation.mapping.id, 11);
    }

    #[tokio::test]
    async fn test_allocate_uses_fresh_code_per_attempt() {
        let mut repo = MockMappingRepository::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        repo.expect_find_by_owner_and_url()
            .returning(|_, _| Ok(None));

        let seen_clone = seen.clone();
        repo.expect_insert().times(6).returning(move |m| {
            seen_clone.lock().unwrap().push(m.code.clone());
            Err(InsertError::CodeTaken(m.code))
        });

        let _ = allocator(repo).allocate("https://x.com", &owner()).await;

        let codes = seen.lock().unwrap();
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), 6);
        assert_eq!(unique.len(), 6);
    }

    #[tokio::test]
    async fn test_allocate_exhausts_after_max_attempts() {
        let mut repo = MockMappingRepository::new();

        repo.expect_find_by_owner_and_url()
            .times(1)
            .returning(|_, _| Ok(None));

        repo.expect_insert()
            .times(6)
            .returning(|m| Err(InsertError::CodeTaken(m.code)));

        let err = allocator(repo)
            .allocate("https://x.com", &owner())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AllocationExhausted { .. }));
        assert!(!err.to_string().contains('6'));
    }

    #[tokio::test]
    async fn test_allocate_respects_configured_attempts() {
        let mut repo = MockMappingRepository::new();

        repo.expect_find_by_owner_and_url()
            .returning(|_, _| Ok(None));
        repo.expect_insert()
            .times(2)
            .returning(|m| Err(InsertError::CodeTaken(m.code)));

        let config = AllocatorConfig {
            max_attempts: 2,
            ..AllocatorConfig::default()
        };
        let result = LinkAllocator::new(Arc::new(repo), config)
            .allocate("https://x.com", &owner())
            .await;

        assert!(matches!(result, Err(AppError::AllocationExhausted { .. })));
    }

    #[tokio::test]
    async fn test_allocate_does_not_retry_store_errors() {
        let mut repo = MockMappingRepository::new();

        repo.expect_find_by_owner_and_url()
            .returning(|_, _| Ok(None));
        repo.expect_insert().times(1).returning(|_| {
            Err(InsertError::Store(AppError::unavailable(
                "Database unavailable",
                json!({}),
            )))
        });

        let result = allocator(repo).allocate("https://x.com", &owner()).await;

        assert!(matches!(result, Err(AppError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_allocate_propagates_lookup_errors() {
        let mut repo = MockMappingRepository::new();

        repo.expect_find_by_owner_and_url()
            .times(1)
            .returning(|_, _| Err(AppError::internal("Database error", json!({}))));
        repo.expect_insert().times(0);

        let result = allocator(repo).allocate("https://x.com", &owner()).await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_allocate_honours_custom_code_length() {
        let mut repo = MockMappingRepository::new();

        repo.expect_find_by_owner_and_url()
            .returning(|_, _| Ok(None));
        repo.expect_insert()
            .withf(|m| m.code.len() == 12 && m.code.chars().all(|c| c == 'x' || c == 'y'))
            .times(1)
            .returning(|m| Ok(stored(&m, 1)));

        let config = AllocatorConfig {
            code_length: 12,
            alphabet: "xy".to_string(),
            max_attempts: 1,
        };
        let allocation = LinkAllocator::new(Arc::new(repo), config)
            .allocate("https://x.com", &owner())
            .await
            .unwrap();

        assert_eq!(allocation.mapping.code.len(), 12);
    }

    #[tokio::test]
    async fn test_list_by_owner_passes_owner_id() {
        let mut repo = MockMappingRepository::new();

        repo.expect_list_by_owner()
            .withf(|owner_id| *owner_id == 42)
            .times(1)
            .returning(|_| Ok(vec![]));

        let mappings = allocator(repo).list_by_owner(&owner()).await.unwrap();
        assert!(mappings.is_empty());
    }
}
