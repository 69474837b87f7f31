//! Speaker social-handle normalization and format checks.
//!
//! Handle fields may hold several comma-separated handles. Stored values are
//! normalized (no leading `@`, trimmed, `", "` separated).

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

static TWITTER_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,15}$").expect("valid regex"));

static BLUESKY_HANDLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9]|[A-Za-z0-9][A-Za-z0-9.-]*[A-Za-z0-9])$").expect("valid regex")
});

fn split_handles(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',')
        .map(|h| h.trim().trim_start_matches('@'))
        .filter(|h| !h.is_empty())
}

/// Normalize a (possibly multi-valued) handle field.
///
/// Returns `None` for blank input so "missing" has a single representation.
pub fn normalize_handle(raw: Option<&str>) -> Option<String> {
    let joined = split_handles(raw?).collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// True when the handle field is null or holds only separators/whitespace.
pub fn is_blank(raw: Option<&str>) -> bool {
    raw.map_or(true, |r| split_handles(r).next().is_none())
}

pub fn is_valid_twitter_handle(raw: &str) -> bool {
    split_handles(raw).all(|h| TWITTER_HANDLE.is_match(h))
}

pub fn is_valid_bluesky_handle(raw: &str) -> bool {
    split_handles(raw).all(|h| BLUESKY_HANDLE.is_match(h))
}

/// Validate both handle fields of a talk. Absent fields are valid.
pub fn validate_handles(twitter: Option<&str>, bluesky: Option<&str>) -> Result<(), CoreError> {
    if let Some(t) = twitter {
        if !is_valid_twitter_handle(t) {
            return Err(CoreError::Validation(format!(
                "Invalid Twitter handle: '{t}'"
            )));
        }
    }
    if let Some(b) = bluesky {
        if !is_valid_bluesky_handle(b) {
            return Err(CoreError::Validation(format!(
                "Invalid Bluesky handle: '{b}'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_at_and_whitespace() {
        assert_eq!(
            normalize_handle(Some(" @brenebrown , @TED ")),
            Some("brenebrown, TED".to_string())
        );
        assert_eq!(normalize_handle(Some(" , @ ")), None);
        assert_eq!(normalize_handle(None), None);
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some(" @ ,")));
        assert!(!is_blank(Some("simonsinek")));
    }

    #[test]
    fn twitter_format() {
        assert!(is_valid_twitter_handle("@simon_sinek"));
        assert!(is_valid_twitter_handle("a, b_c"));
        assert!(!is_valid_twitter_handle("this_handle_is_far_too_long"));
        assert!(!is_valid_twitter_handle("has.dot"));
    }

    #[test]
    fn bluesky_format() {
        assert!(is_valid_bluesky_handle("ted.com"));
        assert!(is_valid_bluesky_handle("@user.bsky.social"));
        assert!(is_valid_bluesky_handle("x"));
        assert!(!is_valid_bluesky_handle(".leading.dot"));
        assert!(!is_valid_bluesky_handle("under_score.bsky.social"));
    }

    #[test]
    fn validate_handles_reports_offending_field() {
        assert!(validate_handles(None, None).is_ok());
        let err = validate_handles(Some("bad handle!"), None).unwrap_err();
        assert!(err.to_string().contains("Twitter"));
        let err = validate_handles(None, Some("-bad-")).unwrap_err();
        assert!(err.to_string().contains("Bluesky"));
    }
}
