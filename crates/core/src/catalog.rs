//! Field rules for catalog writes (talks and themes).

use crate::error::CoreError;

/// Theme categories accepted by the store.
pub const THEME_CATEGORIES: &[&str] = &["emotion", "life_phase", "role", "other"];

/// Reject a blank required text field.
pub fn validate_required(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// A talk needs at least one of its two external references.
pub fn validate_external_urls(
    ted_url: Option<&str>,
    youtube_url: Option<&str>,
) -> Result<(), CoreError> {
    if is_blank(ted_url) && is_blank(youtube_url) {
        return Err(CoreError::Validation(
            "A talk needs a TED URL or a YouTube URL".to_string(),
        ));
    }
    for url in [ted_url, youtube_url].into_iter().flatten() {
        let url = url.trim();
        if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CoreError::Validation(format!(
                "External URL must be absolute: '{url}'"
            )));
        }
    }
    Ok(())
}

/// Value a nullable column holds after a partial update: `None` keeps
/// `current`, an empty patch clears it.
pub fn patched<'a>(patch: Option<&'a str>, current: Option<&'a str>) -> Option<&'a str> {
    match patch {
        Some("") => None,
        Some(value) => Some(value),
        None => current,
    }
}

pub fn validate_theme_category(category: Option<&str>) -> Result<(), CoreError> {
    match category {
        Some(c) if !THEME_CATEGORIES.contains(&c) => Err(CoreError::Validation(format!(
            "Unknown theme category '{c}', expected one of: {}",
            THEME_CATEGORIES.join(", ")
        ))),
        _ => Ok(()),
    }
}
