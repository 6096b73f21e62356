//! Input validation helpers
//!
//! Centralized text length limits and validation functions used by the
//! API handlers. SQLite TEXT has no built-in length enforcement.

use validator::ValidateEmail;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Person and food names
pub const MAX_NAME_LEN: usize = 200;

/// Shortest accepted person or food name
pub const MIN_NAME_LEN: usize = 3;

/// Food descriptions
pub const MAX_NOTE_LEN: usize = 1000;

/// Categories and allergen labels
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 20;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// ── Generic helpers ─────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")).with_detail("field", field));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

// ── Domain rules ────────────────────────────────────────────────────

/// Names need at least three visible characters
pub fn validate_name(value: &str, field: &str) -> Result<(), AppError> {
    validate_required_text(value, field, MAX_NAME_LEN)?;
    if value.trim().chars().count() < MIN_NAME_LEN {
        return Err(AppError::validation(format!(
            "{field} must be at least {MIN_NAME_LEN} characters"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    if !value.trim().validate_email() {
        return Err(AppError::validation("email is not a valid address").with_detail("field", "email"));
    }
    Ok(())
}

pub fn validate_password(value: &str) -> Result<(), AppError> {
    let len = value.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(AppError::validation(format!(
            "password must be {MIN_PASSWORD_LEN}-{MAX_PASSWORD_LEN} characters"
        ))
        .with_detail("field", "password"));
    }
    Ok(())
}

/// Emails are compared trimmed and lower-cased
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Leves", "name", 10).is_ok());
        assert!(validate_required_text("   ", "name", 10).is_err());
        assert!(validate_required_text("árvíztűrő tükörfúrógép", "name", 10).is_err());
        // Limits count characters, not bytes
        assert!(validate_required_text("őőőőő", "name", 5).is_ok());
    }

    #[test]
    fn test_name_minimum() {
        assert!(validate_name("Bab", "full_name").is_ok());
        assert!(validate_name(" Ab ", "full_name").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("kovacs.bela@example.hu").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
        assert_eq!(normalize_email("  Anna@Example.COM "), "anna@example.com");
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password(&"x".repeat(20)).is_ok());
        assert!(validate_password(&"x".repeat(21)).is_err());
    }
}
