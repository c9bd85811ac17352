//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so every handler
//! checks its inputs here before touching the store.

use crate::utils::AppError;
use shared::ErrorCode;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: products, users, delivery names
pub const MAX_NAME_LEN: usize = 200;

/// Product descriptions, admin responses
pub const MAX_NOTE_LEN: usize = 2000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Pakistani mobile numbers: exactly 11 digits
pub const MOBILE_DIGITS: usize = 11;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a required string with a minimum trimmed length.
pub fn validate_text_range(
    value: &str,
    field: &str,
    min_len: usize,
    max_len: usize,
) -> Result<(), AppError> {
    validate_required_text(value, field, max_len)?;
    if value.trim().chars().count() < min_len {
        return Err(AppError::validation(format!(
            "{field} must be at least {min_len} characters"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
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

/// Mobile number: exactly 11 ASCII digits after trimming.
pub fn validate_mobile(value: &str) -> Result<(), AppError> {
    let v = value.trim();
    if v.len() != MOBILE_DIGITS || !v.bytes().all(|b| b.is_ascii_digit()) {
        return Err(
            AppError::validation(format!("mobile must be exactly {MOBILE_DIGITS} digits"))
                .with_detail("field", "mobile"),
        );
    }
    Ok(())
}

/// Email of the form `local@domain.tld`, no whitespace.
pub fn validate_email(value: &str) -> Result<(), AppError> {
    let v = value.trim();
    let invalid = || AppError::validation("email is not valid").with_detail("field", "email");

    if v.is_empty() || v.len() > MAX_EMAIL_LEN || v.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = v.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// Password length in characters.
pub fn validate_password(value: &str) -> Result<(), AppError> {
    let len = value.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(AppError::new(ErrorCode::PasswordTooShort).with_detail("field", "password"));
    }
    Ok(())
}

/// Non-negative finite amount.
pub fn validate_price(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("{field} must be a non-negative number"),
        )
        .with_detail("field", field));
    }
    Ok(())
}
