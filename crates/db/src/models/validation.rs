//! Row shapes and the aggregate report of the validation sweep.
//!
//! Each rule has its own typed row so the remediation UI gets exactly the
//! fields it needs to link to a fix.

use arcana_core::sweep::{RuleFailure, SweepRule, ValidationSummary};
use arcana_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::card::CardMappingCount;

/// Minimal talk identity used inside duplicate groups.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TalkRef {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub speaker_name: String,
}

/// All active talks sharing one YouTube video id.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateYoutubeGroup {
    pub youtube_video_id: String,
    pub talks: Vec<TalkRef>,
}

/// Talk-level issue row (missing URLs, thumbnails, descriptions, mappings).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TalkIssue {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub speaker_name: String,
    pub ted_url: Option<String>,
    pub youtube_url: Option<String>,
    pub youtube_video_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
}

/// Mapping whose long-form rationale is missing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MappingMissingRationale {
    pub mapping_id: DbId,
    pub card_id: DbId,
    pub card_name: String,
    pub card_slug: String,
    pub card_image_url: String,
    pub talk_id: DbId,
    pub talk_title: String,
    pub talk_speaker_name: String,
    pub talk_slug: String,
    pub rationale_short: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SoftDeletedTalk {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub speaker_name: String,
    pub deleted_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MissingSocialHandles {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub speaker_name: String,
    pub speaker_twitter_handle: Option<String>,
    pub speaker_bluesky_handle: Option<String>,
}

/// Issues found by one sweep, one typed list per rule.
///
/// A rule that failed to execute leaves its list empty and appears in
/// `errors` instead.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationIssues {
    pub duplicate_youtube_ids: Vec<DuplicateYoutubeGroup>,
    pub missing_both_urls: Vec<TalkIssue>,
    pub missing_thumbnails: Vec<TalkIssue>,
    pub external_thumbnails: Vec<TalkIssue>,
    pub short_descriptions: Vec<TalkIssue>,
    pub cards_without_primary_mapping: Vec<CardMappingCount>,
    pub talks_not_mapped_to_any_card: Vec<TalkIssue>,
    pub mappings_missing_long_rationale: Vec<MappingMissingRationale>,
    pub soft_deleted_talks: Vec<SoftDeletedTalk>,
    pub missing_social_handles: Vec<MissingSocialHandles>,
    pub errors: Vec<RuleFailure>,
}

impl ValidationIssues {
    /// Number of issues a rule produced.
    pub fn count(&self, rule: SweepRule) -> usize {
        match rule {
            SweepRule::DuplicateYoutubeIds => self.duplicate_youtube_ids.len(),
            SweepRule::MissingBothUrls => self.missing_both_urls.len(),
            SweepRule::MissingThumbnails => self.missing_thumbnails.len(),
            SweepRule::ExternalThumbnails => self.external_thumbnails.len(),
            SweepRule::ShortDescriptions => self.short_descriptions.len(),
            SweepRule::CardsWithoutPrimaryMapping => self.cards_without_primary_mapping.len(),
            SweepRule::TalksNotMappedToAnyCard => self.talks_not_mapped_to_any_card.len(),
            SweepRule::MappingsMissingLongRationale => self.mappings_missing_long_rationale.len(),
            SweepRule::SoftDeletedTalks => self.soft_deleted_talks.len(),
            SweepRule::MissingSocialHandles => self.missing_social_handles.len(),
        }
    }

    pub fn has_failed(&self, rule: SweepRule) -> bool {
        self.errors.iter().any(|e| e.rule == rule)
    }

    /// Severity-bucketed counts. Failed rules are excluded from `details`.
    pub fn summary(&self) -> ValidationSummary {
        let counts: Vec<(SweepRule, usize)> = SweepRule::all()
            .filter(|rule| !self.has_failed(*rule))
            .map(|rule| (rule, self.count(rule)))
            .collect();
        ValidationSummary::from_counts(&counts, &self.errors)
    }
}

/// Full sweep result returned to the admin UI.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub issues: ValidationIssues,
    pub summary: ValidationSummary,
}

impl From<ValidationIssues> for ValidationReport {
    fn from(issues: ValidationIssues) -> Self {
        let summary = issues.summary();
        Self { issues, summary }
    }
}
