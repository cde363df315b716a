//! Rating scales and write-side validation helpers
//!
//! CID ratings run 1-3, probability and impact run 1-5. Optional numeric
//! fields are carried as `Option<u8>`; "unset" never becomes zero.

use crate::errors::ValidationError;

/// Lowest confidentiality/integrity/availability rating
pub const CID_MIN: u8 = 1;
/// Highest confidentiality/integrity/availability rating
pub const CID_MAX: u8 = 3;

/// Lowest probability or impact value
pub const SCALE_MIN: u8 = 1;
/// Highest probability or impact value
pub const SCALE_MAX: u8 = 5;

/// Maximum length of short text fields (names, owners, responsible)
pub const NAME_MAX_LEN: usize = 120;
/// Maximum length of control names
pub const CONTROL_NAME_MAX_LEN: usize = 160;

fn check_range(field: &'static str, value: u8, min: u8, max: u8) -> Result<u8, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Validate a single CID rating (1-3)
pub fn validate_cid(field: &'static str, value: u8) -> Result<u8, ValidationError> {
    check_range(field, value, CID_MIN, CID_MAX)
}

/// Validate a probability or impact value (1-5)
pub fn validate_scale(field: &'static str, value: u8) -> Result<u8, ValidationError> {
    check_range(field, value, SCALE_MIN, SCALE_MAX)
}

/// Validate an optional probability or impact value; `None` always passes
pub fn validate_optional_scale(
    field: &'static str,
    value: Option<u8>,
) -> Result<Option<u8>, ValidationError> {
    value.map(|v| validate_scale(field, v)).transpose()
}

/// Require non-blank text and enforce a length limit
pub fn validate_required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    validate_length(field, Some(value), max)
}

/// Enforce a length limit on optional text
pub fn validate_length(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        _ => Ok(()),
    }
}

/// Normalize optional text: blank strings are treated as unset
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// True when an optional text field carries a non-blank value
pub fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
