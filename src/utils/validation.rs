//! Validation Utilities
//!
//! Input validation functions for account data and API requests.

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

/// Validates email address format using a comprehensive regex pattern
pub fn validate_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    regex.is_match(email)
}

/// Normalizes an email address to lowercase and removes surrounding whitespace
///
/// The normalized form is the account's lookup key everywhere in the service.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates URL format for avatar assets
pub fn validate_url(url: &str) -> bool {
    if url.is_empty() {
        return true; // Empty URLs are allowed for optional fields
    }

    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = URL_REGEX.get_or_init(|| {
        Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("Failed to compile URL regex")
    });

    regex.is_match(url) && url.len() <= 512
}

/// Custom validator for email fields using the validator crate
pub fn email_validator(email: &str) -> Result<(), ValidationError> {
    if validate_email(email) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_email"))
    }
}

/// Custom validator for URL fields using the validator crate
pub fn url_validator(url: &str) -> Result<(), ValidationError> {
    if validate_url(url) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_url"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("test.user+tag@domain.co.uk"));
        assert!(!validate_email("invalid.email"));
        assert!(!validate_email("@domain.com"));
        assert!(!validate_email("user@"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  USER@EXAMPLE.COM  "), "user@example.com");
        assert_eq!(normalize_email("Test@Domain.org"), "test@domain.org");
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com"));
        assert!(validate_url("http://example.com/path?query=1"));
        assert!(validate_url("")); // Empty is allowed
        assert!(!validate_url("ftp://example.com"));
        assert!(!validate_url("not-a-url"));
        assert!(!validate_url("https://"));
    }
}
