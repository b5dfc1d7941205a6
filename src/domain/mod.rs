//! Domain layer containing business entities and repository contracts.
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers; business logic lives in [`crate::application::services`].
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions

pub mod entities;
pub mod repositories;
