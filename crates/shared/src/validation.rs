//! Common validation utilities for use with `validator` custom rules.

use validator::ValidationError;

lazy_static::lazy_static! {
    /// Contact strings: digits, spaces, and the usual phone punctuation,
    /// or anything containing an `@` (an email address).
    static ref CONTACT_REGEX: regex::Regex =
        regex::Regex::new(r"^(\+?[0-9(][0-9 ()\-.]{3,}|[^@\s]+@[^@\s]+)$").unwrap();
}

/// Validates that a string is not empty after trimming whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates a guest group contact (phone number or email).
pub fn validate_contact(value: &str) -> Result<(), ValidationError> {
    if CONTACT_REGEX.is_match(value.trim()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("contact_format");
        err.message = Some("Contact must be a phone number or email address".into());
        Err(err)
    }
}
