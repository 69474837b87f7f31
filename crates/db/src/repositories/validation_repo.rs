//! Read-only queries behind the validation sweep, one per rule.
//!
//! Rules that look at talks only consider active rows unless stated
//! otherwise. Nothing here writes.

use std::collections::BTreeMap;

use arcana_core::sweep::{is_external_thumbnail, MIN_DESCRIPTION_LENGTH};
use sqlx::PgPool;

use crate::models::card::CardMappingCount;
use crate::models::validation::{
    DuplicateYoutubeGroup, MappingMissingRationale, MissingSocialHandles, SoftDeletedTalk,
    TalkIssue, TalkRef,
};
use crate::repositories::MappingRepo;

const ISSUE_COLUMNS: &str = "id, slug, title, speaker_name, ted_url, youtube_url, \
    youtube_video_id, thumbnail_url, description";

/// Row of the second phase of the duplicate-video query.
#[derive(sqlx::FromRow)]
struct DuplicateMember {
    youtube_video_id: String,
    #[sqlx(flatten)]
    talk: TalkRef,
}

pub struct ValidationRepo;

impl ValidationRepo {
    /// Active talks sharing a YouTube video id, grouped by id.
    ///
    /// The offending ids are found with an aggregate first so only member
    /// rows of duplicate groups are fetched.
    pub async fn duplicate_youtube_ids(
        pool: &PgPool,
    ) -> Result<Vec<DuplicateYoutubeGroup>, sqlx::Error> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT youtube_video_id FROM talks
             WHERE deleted_at IS NULL AND youtube_video_id IS NOT NULL AND youtube_video_id <> ''
             GROUP BY youtube_video_id
             HAVING COUNT(*) > 1
             ORDER BY youtube_video_id",
        )
        .fetch_all(pool)
        .await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let members = sqlx::query_as::<_, DuplicateMember>(
            "SELECT youtube_video_id, id, slug, title, speaker_name FROM talks
             WHERE youtube_video_id = ANY($1) AND deleted_at IS NULL
             ORDER BY youtube_video_id, created_at, id",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut groups: BTreeMap<String, Vec<TalkRef>> = BTreeMap::new();
        for member in members {
            groups
                .entry(member.youtube_video_id)
                .or_default()
                .push(member.talk);
        }
        Ok(groups
            .into_iter()
            .map(|(youtube_video_id, talks)| DuplicateYoutubeGroup {
                youtube_video_id,
                talks,
            })
            .collect())
    }

    /// Active talks with neither a TED nor a YouTube URL.
    pub async fn missing_both_urls(pool: &PgPool) -> Result<Vec<TalkIssue>, sqlx::Error> {
        let query = format!(
            "SELECT {ISSUE_COLUMNS} FROM talks
             WHERE deleted_at IS NULL
               AND COALESCE(TRIM(ted_url), '') = ''
               AND COALESCE(TRIM(youtube_url), '') = ''
             ORDER BY title, id"
        );
        sqlx::query_as::<_, TalkIssue>(&query).fetch_all(pool).await
    }

    /// Active talks with a null or empty thumbnail.
    pub async fn missing_thumbnails(pool: &PgPool) -> Result<Vec<TalkIssue>, sqlx::Error> {
        let query = format!(
            "SELECT {ISSUE_COLUMNS} FROM talks
             WHERE deleted_at IS NULL AND COALESCE(thumbnail_url, '') = ''
             ORDER BY title, id"
        );
        sqlx::query_as::<_, TalkIssue>(&query).fetch_all(pool).await
    }

    /// Active talks whose thumbnail is an absolute URL outside `owned_prefix`.
    pub async fn external_thumbnails(
        pool: &PgPool,
        owned_prefix: &str,
    ) -> Result<Vec<TalkIssue>, sqlx::Error> {
        let query = format!(
            "SELECT {ISSUE_COLUMNS} FROM talks
             WHERE deleted_at IS NULL AND thumbnail_url ILIKE 'http%'
             ORDER BY title, id"
        );
        let candidates = sqlx::query_as::<_, TalkIssue>(&query).fetch_all(pool).await?;
        Ok(candidates
            .into_iter()
            .filter(|t| {
                t.thumbnail_url
                    .as_deref()
                    .is_some_and(|url| is_external_thumbnail(url, owned_prefix))
            })
            .collect())
    }

    /// Active talks with a missing or thin description.
    pub async fn short_descriptions(pool: &PgPool) -> Result<Vec<TalkIssue>, sqlx::Error> {
        let query = format!(
            "SELECT {ISSUE_COLUMNS} FROM talks
             WHERE deleted_at IS NULL
               AND (description IS NULL OR CHAR_LENGTH(description) < $1)
             ORDER BY title, id"
        );
        sqlx::query_as::<_, TalkIssue>(&query)
            .bind(MIN_DESCRIPTION_LENGTH)
            .fetch_all(pool)
            .await
    }

    pub async fn cards_without_primary_mapping(
        pool: &PgPool,
    ) -> Result<Vec<CardMappingCount>, sqlx::Error> {
        MappingRepo::list_cards_without_primary(pool).await
    }

    /// Active talks that no mapping references.
    pub async fn talks_not_mapped_to_any_card(
        pool: &PgPool,
    ) -> Result<Vec<TalkIssue>, sqlx::Error> {
        let query = format!(
            "SELECT {ISSUE_COLUMNS} FROM talks t
             WHERE t.deleted_at IS NULL
               AND NOT EXISTS (SELECT 1 FROM card_talk_mappings m WHERE m.talk_id = t.id)
             ORDER BY t.title, t.id"
        );
        sqlx::query_as::<_, TalkIssue>(&query).fetch_all(pool).await
    }

    /// Mappings to active talks that lack a long rationale.
    pub async fn mappings_missing_long_rationale(
        pool: &PgPool,
    ) -> Result<Vec<MappingMissingRationale>, sqlx::Error> {
        sqlx::query_as::<_, MappingMissingRationale>(
            "SELECT m.id AS mapping_id,
                    c.id AS card_id, c.name AS card_name, c.slug AS card_slug,
                    c.image_url AS card_image_url,
                    t.id AS talk_id, t.title AS talk_title,
                    t.speaker_name AS talk_speaker_name, t.slug AS talk_slug,
                    m.rationale_short
             FROM card_talk_mappings m
             JOIN cards c ON c.id = m.card_id
             JOIN talks t ON t.id = m.talk_id
             WHERE t.deleted_at IS NULL AND COALESCE(TRIM(m.rationale_long), '') = ''
             ORDER BY c.sequence_index, m.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Soft-deleted talks, oldest deletion first.
    pub async fn soft_deleted_talks(pool: &PgPool) -> Result<Vec<SoftDeletedTalk>, sqlx::Error> {
        sqlx::query_as::<_, SoftDeletedTalk>(
            "SELECT id, slug, title, speaker_name, deleted_at FROM talks
             WHERE deleted_at IS NOT NULL
             ORDER BY deleted_at, id",
        )
        .fetch_all(pool)
        .await
    }

    /// Active talks where either speaker handle is blank.
    pub async fn missing_social_handles(
        pool: &PgPool,
    ) -> Result<Vec<MissingSocialHandles>, sqlx::Error> {
        sqlx::query_as::<_, MissingSocialHandles>(
            "SELECT id, slug, title, speaker_name, speaker_twitter_handle, speaker_bluesky_handle
             FROM talks
             WHERE deleted_at IS NULL
               AND (COALESCE(TRIM(speaker_twitter_handle), '') = ''
                    OR COALESCE(TRIM(speaker_bluesky_handle), '') = '')
             ORDER BY speaker_name, id",
        )
        .fetch_all(pool)
        .await
    }
}
