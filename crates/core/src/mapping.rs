//! Card-to-talk mapping field rules.
//!
//! The mapping manager only guards primary uniqueness. Field-level checks
//! live here so callers can reject bad input before opening a transaction.

use crate::error::CoreError;

/// Weakest allowed mapping strength.
pub const MIN_STRENGTH: i16 = 1;
/// Strongest allowed mapping strength.
pub const MAX_STRENGTH: i16 = 5;

/// Maximum length of the short rationale shown on card pages.
pub const MAX_RATIONALE_SHORT_LEN: usize = 500;

/// Validate that a strength score is within `[MIN_STRENGTH, MAX_STRENGTH]`.
pub fn validate_strength(strength: i16) -> Result<(), CoreError> {
    if (MIN_STRENGTH..=MAX_STRENGTH).contains(&strength) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Strength must be between {MIN_STRENGTH} and {MAX_STRENGTH}, got {strength}"
        )))
    }
}

/// Validate the required short rationale.
pub fn validate_rationale_short(rationale: &str) -> Result<(), CoreError> {
    let trimmed = rationale.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Short rationale is required".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_RATIONALE_SHORT_LEN {
        return Err(CoreError::Validation(format!(
            "Short rationale must be at most {MAX_RATIONALE_SHORT_LEN} characters"
        )));
    }
    Ok(())
}

/// Run every field check for a mapping upsert.
pub fn validate_mapping_fields(strength: i16, rationale_short: &str) -> Result<(), CoreError> {
    validate_strength(strength)?;
    validate_rationale_short(rationale_short)
}

/// Collapse a blank long rationale to `None` so "missing" has one
/// representation in storage.
pub fn normalize_rationale_long(rationale: Option<String>) -> Option<String> {
    rationale
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}
