//! Validation sweep rule registry and report aggregation.
//!
//! The sweep runs ten independent read-only rules over the catalog. Which
//! bucket a rule reports into is fixed by [`SweepRule::severity`]; the admin UI
//! relies on that mapping, so it must not drift.

use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Descriptions shorter than this (in characters) are reported as thin.
pub const MIN_DESCRIPTION_LENGTH: i32 = 50;

// ---------------------------------------------------------------------------
// Rules and severities
// ---------------------------------------------------------------------------

/// Severity bucket of a validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Important,
    Mapping,
    Info,
}

/// One rule of the validation sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepRule {
    DuplicateYoutubeIds,
    MissingBothUrls,
    MissingThumbnails,
    ExternalThumbnails,
    ShortDescriptions,
    CardsWithoutPrimaryMapping,
    TalksNotMappedToAnyCard,
    MappingsMissingLongRationale,
    SoftDeletedTalks,
    MissingSocialHandles,
}

/// Every rule, in sweep execution order.
pub const ALL_RULES: [SweepRule; 10] = [
    SweepRule::DuplicateYoutubeIds,
    SweepRule::MissingBothUrls,
    SweepRule::MissingThumbnails,
    SweepRule::ExternalThumbnails,
    SweepRule::ShortDescriptions,
    SweepRule::CardsWithoutPrimaryMapping,
    SweepRule::TalksNotMappedToAnyCard,
    SweepRule::MappingsMissingLongRationale,
    SweepRule::SoftDeletedTalks,
    SweepRule::MissingSocialHandles,
];

impl SweepRule {
    /// Every rule, in execution order.
    pub fn all() -> impl Iterator<Item = SweepRule> {
        ALL_RULES.into_iter()
    }

    /// Static rule → severity classification.
    pub fn severity(self) -> Severity {
        match self {
            SweepRule::DuplicateYoutubeIds => Severity::Critical,
            SweepRule::MissingBothUrls
            | SweepRule::MissingThumbnails
            | SweepRule::ExternalThumbnails
            | SweepRule::ShortDescriptions => Severity::Important,
            SweepRule::CardsWithoutPrimaryMapping
            | SweepRule::TalksNotMappedToAnyCard
            | SweepRule::MappingsMissingLongRationale => Severity::Mapping,
            SweepRule::SoftDeletedTalks | SweepRule::MissingSocialHandles => Severity::Info,
        }
    }

    /// Stable key used in report `details` and `errors`.
    pub fn key(self) -> &'static str {
        match self {
            SweepRule::DuplicateYoutubeIds => "duplicate_youtube_ids",
            SweepRule::MissingBothUrls => "missing_both_urls",
            SweepRule::MissingThumbnails => "missing_thumbnails",
            SweepRule::ExternalThumbnails => "external_thumbnails",
            SweepRule::ShortDescriptions => "short_descriptions",
            SweepRule::CardsWithoutPrimaryMapping => "cards_without_primary_mapping",
            SweepRule::TalksNotMappedToAnyCard => "talks_not_mapped_to_any_card",
            SweepRule::MappingsMissingLongRationale => "mappings_missing_long_rationale",
            SweepRule::SoftDeletedTalks => "soft_deleted_talks",
            SweepRule::MissingSocialHandles => "missing_social_handles",
        }
    }
}

// ---------------------------------------------------------------------------
// Thumbnail hosting
// ---------------------------------------------------------------------------

/// True when `thumbnail_url` is an absolute http(s) URL outside owned storage.
///
/// Relative paths are served by the app itself and count as owned. The
/// comparison is a plain prefix match against `owned_prefix`.
pub fn is_external_thumbnail(thumbnail_url: &str, owned_prefix: &str) -> bool {
    let url = thumbnail_url.trim();
    let absolute = url.starts_with("http://") || url.starts_with("https://");
    if !absolute {
        return false;
    }
    let prefix = owned_prefix.trim();
    prefix.is_empty() || !url.starts_with(prefix)
}

// ---------------------------------------------------------------------------
// Report aggregation
// ---------------------------------------------------------------------------

/// A rule whose query failed during a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFailure {
    pub rule: SweepRule,
    pub message: String,
}

/// Fixed-shape count summary of a sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub critical: usize,
    pub important: usize,
    pub mapping: usize,
    pub info: usize,
    pub total: usize,
    /// Number of rules that failed to execute.
    pub errored: usize,
    /// Issue count per rule key. Rules that errored are absent.
    pub details: BTreeMap<&'static str, usize>,
}

impl ValidationSummary {
    /// Build a summary from per-rule issue counts and the failed rules.
    pub fn from_counts(counts: &[(SweepRule, usize)], failures: &[RuleFailure]) -> Self {
        let mut summary = ValidationSummary {
            errored: failures.len(),
            ..Default::default()
        };

        for (rule, count) in counts {
            match rule.severity() {
                Severity::Critical => summary.critical += count,
                Severity::Important => summary.important += count,
                Severity::Mapping => summary.mapping += count,
                Severity::Info => summary.info += count,
            }
            summary.total += count;
            summary.details.insert(rule.key(), *count);
        }

        summary
    }
}
