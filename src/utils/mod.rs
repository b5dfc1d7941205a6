//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Random short code generation
//! - [`url_normalizer`] - Destination URL validation
//! - [`db_error`] - PostgreSQL error classification

pub mod code_generator;
pub mod db_error;
pub mod url_normalizer;
