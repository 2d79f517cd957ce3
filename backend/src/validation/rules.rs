//! Common validation rules shared across request payloads.

use validator::ValidationError;

use crate::utils::uuid::is_standard_form;

/// Profile UUIDs on the public API are always hyphenated.
pub fn validate_profile_uuid(value: &str) -> Result<(), ValidationError> {
    if !is_standard_form(value) {
        return Err(ValidationError::new("profile_uuid_invalid_format"));
    }
    Ok(())
}

pub fn validate_world_uuid(value: &str) -> Result<(), ValidationError> {
    if !is_standard_form(value) {
        return Err(ValidationError::new("uuid_invalid_format"));
    }
    Ok(())
}

/// Token headers must be non-empty, bounded and hex encoded.
pub fn validate_token_header(value: &str, max_len: usize) -> Result<(), ValidationError> {
    if value.is_empty() || value.len() > max_len {
        return Err(ValidationError::new("token_invalid_length"));
    }
    if !value.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::new("token_invalid_characters"));
    }
    Ok(())
}
