//! Destination URL validation and shallow normalization.
//!
//! Normalization only trims surrounding whitespace. Host case, trailing
//! slashes, default ports and query strings are kept verbatim, so
//! `https://Example.com` and `https://example.com/` are distinct destinations.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format")]
    InvalidFormat(String),

    #[error("URL must start with http:// or https://")]
    UnsupportedProtocol,
}

/// Validates `input` as an absolute `http`/`https` URL and returns it trimmed.
///
/// # Rules
///
/// 1. Surrounding whitespace is removed
/// 2. The rest must use only RFC 3986 characters and parse as an absolute URL
/// 3. The scheme must be `http` or `https`, compared case-insensitively
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for malformed or empty input.
/// Returns [`UrlNormalizationError::UnsupportedProtocol`] for any other scheme.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("  https://x.com/a?b=c ").unwrap(), "https://x.com/a?b=c");
/// assert_eq!(normalize_url("HTTP://X.com").unwrap(), "HTTP://X.com");
/// assert!(normalize_url("ftp://example.com").is_err());
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlNormalizationError::InvalidFormat(
            "URL is empty".to_string(),
        ));
    }

    // The url crate silently percent-encodes these, but the input is stored as given.
    if let Some(c) = trimmed.chars().find(|&c| !is_uri_char(c)) {
        return Err(UrlNormalizationError::InvalidFormat(format!(
            "URL contains illegal character {c:?}"
        )));
    }

    if has_malformed_escape(trimmed) {
        return Err(UrlNormalizationError::InvalidFormat(
            "URL contains a malformed percent escape".to_string(),
        ));
    }

    let url =
        Url::parse(trimmed).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        _ => Err(UrlNormalizationError::UnsupportedProtocol),
    }
}

/// RFC 3986 unreserved and reserved characters, plus `%` for escapes.
fn is_uri_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._~:/?#[]@!$&'()*+,;=%".contains(c)
}

fn has_malformed_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !matches!(
                (bytes.get(i + 1), bytes.get(i + 2)),
                (Some(h), Some(l)) if h.is_ascii_hexdigit() && l.is_ascii_hexdigit()
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_http() {
        assert_eq!(normalize_url("http://x.com").unwrap(), "http://x.com");
    }

    #[test]
    fn test_accepts_https_with_query() {
        assert_eq!(
            normalize_url("https://x.com/a?b=c").unwrap(),
            "https://x.com/a?b=c"
        );
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(
            normalize_url("  \thttps://example.com/path\n").unwrap(),
            "https://example.com/path"
        );
    }

    #[test]
    fn test_preserves_host_case_and_port() {
        assert_eq!(
            normalize_url("https://EXAMPLE.com:443/Path").unwrap(),
            "https://EXAMPLE.com:443/Path"
        );
    }

    #[test]
    fn test_preserves_trailing_slash_difference() {
        assert_ne!(
            normalize_url("https://example.com").unwrap(),
            normalize_url("https://example.com/").unwrap()
        );
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        assert_eq!(normalize_url("HTTPS://x.com").unwrap(), "HTTPS://x.com");
        assert_eq!(normalize_url("Http://x.com").unwrap(), "Http://x.com");
    }

    #[test]
    fn test_preserves_fragment() {
        assert_eq!(
            normalize_url("https://example.com/page#section").unwrap(),
            "https://example.com/page#section"
        );
    }

    #[test]
    fn test_rejects_ftp() {
        assert_eq!(
            normalize_url("ftp://example.com"),
            Err(UrlNormalizationError::UnsupportedProtocol)
        );
    }

    #[test]
    fn test_rejects_javascript_and_mailto() {
        assert_eq!(
            normalize_url("javascript:alert('xss')"),
            Err(UrlNormalizationError::UnsupportedProtocol)
        );
        assert_eq!(
            normalize_url("mailto:test@example.com"),
            Err(UrlNormalizationError::UnsupportedProtocol)
        );
    }

    #[test]
    fn test_rejects_not_a_url() {
        assert!(matches!(
            normalize_url("not a url"),
            Err(UrlNormalizationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_empty_and_blank() {
        assert!(matches!(
            normalize_url(""),
            Err(UrlNormalizationError::InvalidFormat(_))
        ));
        assert!(matches!(
            normalize_url("   "),
            Err(UrlNormalizationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_missing_scheme() {
        assert!(matches!(
            normalize_url("example.com/path"),
            Err(UrlNormalizationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_inner_whitespace() {
        assert!(matches!(
            normalize_url("https://example.com/a b"),
            Err(UrlNormalizationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_characters_outside_uri_syntax() {
        for input in [
            "http://x.com/<script>",
            "http://x.com/a\"b",
            "http://x.com/a|b",
            "https://x.com/\u{e9}",
            "https://x.com/{id}",
            "https://x.com/a\\b",
            "https://x.com/a^b",
        ] {
            assert!(
                matches!(normalize_url(input), Err(UrlNormalizationError::InvalidFormat(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_accepts_reserved_and_escaped_characters() {
        let input = "https://x.com/a%20b;p=1?q=[x]&r=$!*'(),+@:~#frag";
        assert_eq!(normalize_url(input).unwrap(), input);
    }

    #[test]
    fn test_rejects_malformed_percent_escape() {
        assert!(matches!(
            normalize_url("https://x.com/100%"),
            Err(UrlNormalizationError::InvalidFormat(_))
        ));
        assert!(matches!(
            normalize_url("https://x.com/%zz"),
            Err(UrlNormalizationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            UrlNormalizationError::UnsupportedProtocol.to_string(),
            "URL must start with http:// or https://"
        );
        assert_eq!(
            UrlNormalizationError::InvalidFormat("x".into()).to_string(),
            "Invalid URL format"
        );
    }
}
