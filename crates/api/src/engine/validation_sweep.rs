//! Validation Sweep: runs every integrity rule and aggregates a report.
//!
//! Rules run one after another on the shared pool. A rule whose query fails
//! is recorded in `issues.errors` and the remaining rules still run, so the
//! sweep itself never fails.

use arcana_core::sweep::{RuleFailure, SweepRule, ValidationSummary};
use arcana_db::models::validation::{ValidationIssues, ValidationReport};
use arcana_db::repositories::ValidationRepo;
use sqlx::PgPool;

pub struct ValidationSweep {
    pool: PgPool,
    owned_prefix: String,
}

impl ValidationSweep {
    /// `owned_prefix` is the public URL prefix of owned thumbnail storage.
    pub fn new(pool: PgPool, owned_prefix: String) -> Self {
        Self { pool, owned_prefix }
    }

    /// Run all rules and return the typed issues with their summary.
    pub async fn run(&self) -> ValidationReport {
        let issues = self.collect().await;
        let report = ValidationReport::from(issues);
        let s = &report.summary;
        tracing::info!(
            critical = s.critical,
            important = s.important,
            mapping = s.mapping,
            info = s.info,
            errored = s.errored,
            "Validation sweep finished",
        );
        report
    }

    /// Run all rules and return only the counts.
    pub async fn summary(&self) -> ValidationSummary {
        self.run().await.summary
    }

    async fn collect(&self) -> ValidationIssues {
        let pool = &self.pool;
        let mut issues = ValidationIssues::default();
        let errors = &mut issues.errors;

        issues.duplicate_youtube_ids = capture(
            errors,
            SweepRule::DuplicateYoutubeIds,
            ValidationRepo::duplicate_youtube_ids(pool).await,
        );
        issues.missing_both_urls = capture(
            errors,
            SweepRule::MissingBothUrls,
            ValidationRepo::missing_both_urls(pool).await,
        );
        issues.missing_thumbnails = capture(
            errors,
            SweepRule::MissingThumbnails,
            ValidationRepo::missing_thumbnails(pool).await,
        );
        issues.external_thumbnails = capture(
            errors,
            SweepRule::ExternalThumbnails,
            ValidationRepo::external_thumbnails(pool, &self.owned_prefix).await,
        );
        issues.short_descriptions = capture(
            errors,
            SweepRule::ShortDescriptions,
            ValidationRepo::short_descriptions(pool).await,
        );
        issues.cards_without_primary_mapping = capture(
            errors,
            SweepRule::CardsWithoutPrimaryMapping,
            ValidationRepo::cards_without_primary_mapping(pool).await,
        );
        issues.talks_not_mapped_to_any_card = capture(
            errors,
            SweepRule::TalksNotMappedToAnyCard,
            ValidationRepo::talks_not_mapped_to_any_card(pool).await,
        );
        issues.mappings_missing_long_rationale = capture(
            errors,
            SweepRule::MappingsMissingLongRationale,
            ValidationRepo::mappings_missing_long_rationale(pool).await,
        );
        issues.soft_deleted_talks = capture(
            errors,
            SweepRule::SoftDeletedTalks,
            ValidationRepo::soft_deleted_talks(pool).await,
        );
        issues.missing_social_handles = capture(
            errors,
            SweepRule::MissingSocialHandles,
            ValidationRepo::missing_social_handles(pool).await,
        );

        issues
    }
}

/// Keep a rule's rows, or record its failure and report no rows.
fn capture<T>(
    errors: &mut Vec<RuleFailure>,
    rule: SweepRule,
    result: Result<Vec<T>, sqlx::Error>,
) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(err) => {
            tracing::warn!(rule = rule.key(), error = %err, "Validation rule failed");
            errors.push(RuleFailure {
                rule,
                message: err.to_string(),
            });
            Vec::new()
        }
    }
}
