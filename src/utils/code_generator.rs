//! Random short code generation.
//!
//! Codes are drawn character by character from a fixed alphabet using the
//! thread-local RNG, so concurrent allocations never share generator state.
//! Collision resistance comes from the keyspace (62^8 for the defaults), not
//! from unpredictability; uniqueness is still enforced by the store.

use rand::Rng;

/// Base62 alphabet: digits, then upper case, then lower case.
pub const BASE62_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Default number of characters in a generated code.
pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Generates a code of `length` characters drawn uniformly, with replacement,
/// from `alphabet`.
///
/// # Panics
///
/// Panics if `alphabet` is empty.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(8, BASE62_ALPHABET.as_bytes());
/// assert_eq!(code.len(), 8);
/// ```
pub fn generate_code(length: usize, alphabet: &[u8]) -> String {
    assert!(!alphabet.is_empty(), "alphabet must not be empty");

    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..alphabet.len());
            alphabet[idx] as char
        })
        .collect()
}
