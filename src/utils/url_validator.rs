//! Target URL validation and normalization.
//!
//! Ensures consistent URL representation by normalizing hostnames, removing
//! fragments and default ports, and rejecting over-long or denylisted URLs.

use url::Url;

/// Errors that can occur during target URL validation.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL exceeds the maximum length of {0} characters")]
    TooLong(usize),

    #[error("URL host is not allowed")]
    BlockedHost,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Validates a target URL and normalizes it to a canonical form.
///
/// # Rules
///
/// 1. **Length**: input must not exceed `max_length` characters
/// 2. **Protocol**: only HTTP and HTTPS are allowed
/// 3. **Host denylist**: the host must not appear in `blocked_hosts`
///    (case-insensitive comparison)
/// 4. **Hostname**: converted to lowercase
/// 5. **Default ports**: removed (80 for HTTP, 443 for HTTPS)
/// 6. **Fragments**: removed (e.g., `#section`)
/// 7. **Query parameters and path**: preserved as-is
///
/// Normalization makes the per-owner deduplication check stable: the same
/// logical URL always maps to the same stored string.
///
/// # Errors
///
/// Returns [`UrlValidationError::TooLong`] for over-long input.
/// Returns [`UrlValidationError::InvalidFormat`] for malformed URLs.
/// Returns [`UrlValidationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
/// Returns [`UrlValidationError::BlockedHost`] for denylisted hosts.
pub fn validate_target_url(
    input: &str,
    max_length: usize,
    blocked_hosts: &[String],
) -> Result<String, UrlValidationError> {
    if input.len() > max_length {
        return Err(UrlValidationError::TooLong(max_length));
    }

    let mut url =
        Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if let Some(host) = url.host_str() {
        if blocked_hosts.iter().any(|b| b.eq_ignore_ascii_case(host)) {
            return Err(UrlValidationError::BlockedHost);
        }

        let host_lowercase = host.to_ascii_lowercase();
        url.set_host(Some(&host_lowercase)).map_err(|_| {
            UrlValidationError::NormalizationFailed("Failed to set normalized host".to_string())
        })?;
    }

    url.set_fragment(None);

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        url.set_port(None).map_err(|_| {
            UrlValidationError::NormalizationFailed("Failed to remove default port".to_string())
        })?;
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_LENGTH: usize = 2048;

    fn blocked() -> Vec<String> {
        vec![
            "malware.com".to_string(),
            "phishing.net".to_string(),
            "spam.org".to_string(),
        ]
    }

    fn validate(input: &str) -> Result<String, UrlValidationError> {
        validate_target_url(input, MAX_LENGTH, &blocked())
    }

    #[test]
    fn test_validate_simple_https() {
        let result = validate("https://example.com");
        assert_eq!(result.unwrap(), "https://example.com/");
    }

    #[test]
    fn test_validate_uppercase_host() {
        let result = validate("https://EXAMPLE.COM/path");
        assert_eq!(result.unwrap(), "https://example.com/path");
    }

    #[test]
    fn test_validate_remove_default_https_port() {
        let result = validate("https://example.com:443/path");
        assert_eq!(result.unwrap(), "https://example.com/path");
    }

    #[test]
    fn test_validate_remove_default_http_port() {
        let result = validate("http://example.com:80/path");
        assert_eq!(result.unwrap(), "http://example.com/path");
    }

    #[test]
    fn test_validate_keep_custom_port() {
        let result = validate("http://example.com:8080/path");
        assert_eq!(result.unwrap(), "http://example.com:8080/path");
    }

    #[test]
    fn test_validate_remove_fragment() {
        let result = validate("https://example.com/page#section");
        assert_eq!(result.unwrap(), "https://example.com/page");
    }

    #[test]
    fn test_validate_preserve_query_params() {
        let result = validate("https://example.com/search?q=rust&lang=en");
        assert_eq!(result.unwrap(), "https://example.com/search?q=rust&lang=en");
    }

    #[test]
    fn test_validate_complex_url() {
        let result = validate("HTTPS://EXAMPLE.COM:443/Path?key=VALUE#anchor");
        assert_eq!(result.unwrap(), "https://example.com/Path?key=VALUE");
    }

    #[test]
    fn test_validate_invalid_url() {
        let result = validate("not a valid url");
        assert!(matches!(
            result.unwrap_err(),
            UrlValidationError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_validate_no_protocol() {
        let result = validate("example.com");
        assert!(matches!(
            result.unwrap_err(),
            UrlValidationError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_validate_javascript_protocol() {
        let result = validate("javascript:alert('xss')");
        assert!(matches!(
            result.unwrap_err(),
            UrlValidationError::UnsupportedProtocol
        ));
    }

    #[test]
    fn test_validate_ftp_protocol() {
        let result = validate("ftp://example.com/file.txt");
        assert!(matches!(
            result.unwrap_err(),
            UrlValidationError::UnsupportedProtocol
        ));
    }

    #[test]
    fn test_validate_blocked_host() {
        let result = validate("https://malware.com/payload");
        assert!(matches!(result.unwrap_err(), UrlValidationError::BlockedHost));
    }

    #[test]
    fn test_validate_blocked_host_case_insensitive() {
        let result = validate("https://MALWARE.com/payload");
        assert!(matches!(result.unwrap_err(), UrlValidationError::BlockedHost));
    }

    #[test]
    fn test_validate_subdomain_of_blocked_host_allowed() {
        // The denylist matches exact hosts only.
        let result = validate("https://sub.malware.com/");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_too_long() {
        let long_path = "a".repeat(MAX_LENGTH);
        let url = format!("https://example.com/{}", long_path);
        let result = validate(&url);
        assert!(matches!(result.unwrap_err(), UrlValidationError::TooLong(_)));
    }

    #[test]
    fn test_validate_length_boundary() {
        let url = format!("https://example.com/{}", "a".repeat(100));
        let result = validate_target_url(&url, url.len(), &blocked());
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_normalization_is_stable() {
        let first = validate("HTTPS://Example.COM:443/x#frag").unwrap();
        let second = validate(&first).unwrap();
        assert_eq!(first, second);
    }
}
