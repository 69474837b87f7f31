//! Repository for the `talks` table.
//!
//! Public reads filter on `deleted_at IS NULL`. The `_include_deleted`
//! variants and the admin listings see soft-deleted rows too.

use arcana_core::naming::{talk_slug, with_collision_suffix};
use arcana_core::types::{DbId, Timestamp};
use chrono::Utc;
use sqlx::PgPool;

use crate::models::mapping::Mapping;
use crate::models::talk::{
    AdminTalk, CreateTalk, HardDeletedTalk, Talk, TalkCardRef, TalkStats, UpdateTalk,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, title, speaker_name, ted_url, youtube_url, youtube_video_id, \
    description, duration_seconds, event_name, year, thumbnail_url, language, \
    speaker_twitter_handle, speaker_bluesky_handle, deleted_at, created_at, updated_at";

/// Same columns qualified with the `t` alias, for joins.
const T_COLUMNS: &str = "t.id, t.slug, t.title, t.speaker_name, t.ted_url, t.youtube_url, \
    t.youtube_video_id, t.description, t.duration_seconds, t.event_name, t.year, \
    t.thumbnail_url, t.language, t.speaker_twitter_handle, t.speaker_bluesky_handle, \
    t.deleted_at, t.created_at, t.updated_at";

const MAPPING_COLUMNS: &str = "id, card_id, talk_id, is_primary, strength, rationale_short, \
    rationale_long, created_at, updated_at";

/// Provides CRUD and lifecycle persistence for talks.
pub struct TalkRepo;

impl TalkRepo {
    /// Insert a new talk, returning the created row.
    ///
    /// The slug is derived from speaker and title. If it is already taken a
    /// time-based suffix is appended.
    pub async fn create(pool: &PgPool, input: &CreateTalk) -> Result<Talk, sqlx::Error> {
        let base = talk_slug(&input.speaker_name, &input.title);
        let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM talks WHERE slug = $1)")
            .bind(&base)
            .fetch_one(pool)
            .await?;
        let slug = if taken {
            let slug = with_collision_suffix(&base, Utc::now().timestamp_millis().unsigned_abs());
            tracing::debug!(base = %base, slug = %slug, "Talk slug collision, using suffixed slug");
            slug
        } else {
            base
        };

        let query = format!(
            "INSERT INTO talks
                (slug, title, speaker_name, ted_url, youtube_url, youtube_video_id, description,
                 duration_seconds, event_name, year, thumbnail_url, language,
                 speaker_twitter_handle, speaker_bluesky_handle)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Talk>(&query)
            .bind(&slug)
            .bind(&input.title)
            .bind(&input.speaker_name)
            .bind(&input.ted_url)
            .bind(&input.youtube_url)
            .bind(&input.youtube_video_id)
            .bind(&input.description)
            .bind(input.duration_seconds)
            .bind(&input.event_name)
            .bind(input.year)
            .bind(&input.thumbnail_url)
            .bind(&input.language)
            .bind(&input.speaker_twitter_handle)
            .bind(&input.speaker_bluesky_handle)
            .fetch_one(pool)
            .await
    }

    /// Find a talk by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Talk>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM talks WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Talk>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a talk by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Talk>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM talks WHERE id = $1");
        sqlx::query_as::<_, Talk>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active talk by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Talk>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM talks WHERE slug = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Talk>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Page through active talks, newest first.
    pub async fn list_public(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Talk>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM talks WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Talk>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Active talks tagged with a theme, by title.
    pub async fn list_active_for_theme(
        pool: &PgPool,
        theme_id: DbId,
    ) -> Result<Vec<Talk>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM talks
             WHERE deleted_at IS NULL
               AND id IN (SELECT talk_id FROM talk_themes WHERE theme_id = $1)
             ORDER BY title, id"
        );
        sqlx::query_as::<_, Talk>(&query)
            .bind(theme_id)
            .fetch_all(pool)
            .await
    }

    /// Admin listing with mapping counts, newest first.
    pub async fn list_for_admin(
        pool: &PgPool,
        include_deleted: bool,
    ) -> Result<Vec<AdminTalk>, sqlx::Error> {
        let query = format!(
            "SELECT {T_COLUMNS}, COUNT(m.id) AS mappings_count
             FROM talks t
             LEFT JOIN card_talk_mappings m ON m.talk_id = t.id
             WHERE $1 OR t.deleted_at IS NULL
             GROUP BY t.id
             ORDER BY t.created_at DESC, t.id DESC"
        );
        sqlx::query_as::<_, AdminTalk>(&query)
            .bind(include_deleted)
            .fetch_all(pool)
            .await
    }

    /// Admin search over title, speaker and description.
    pub async fn search_for_admin(
        pool: &PgPool,
        term: &str,
        include_deleted: bool,
    ) -> Result<Vec<AdminTalk>, sqlx::Error> {
        let query = format!(
            "SELECT {T_COLUMNS}, COUNT(m.id) AS mappings_count
             FROM talks t
             LEFT JOIN card_talk_mappings m ON m.talk_id = t.id
             WHERE ($2 OR t.deleted_at IS NULL)
               AND (t.title ILIKE $1 OR t.speaker_name ILIKE $1 OR t.description ILIKE $1)
             GROUP BY t.id
             ORDER BY t.created_at DESC, t.id DESC"
        );
        sqlx::query_as::<_, AdminTalk>(&query)
            .bind(format!("%{}%", term.trim()))
            .bind(include_deleted)
            .fetch_all(pool)
            .await
    }

    /// Update a talk. Only non-`None` fields in `input` are applied, and an
    /// empty string clears a nullable text column.
    ///
    /// Soft-deleted talks can still be edited from the admin UI. Returns
    /// `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTalk,
    ) -> Result<Option<Talk>, sqlx::Error> {
        let query = format!(
            "UPDATE talks SET
                title = COALESCE($2, title),
                speaker_name = COALESCE($3, speaker_name),
                ted_url = CASE WHEN $4::TEXT IS NULL THEN ted_url
                          ELSE NULLIF($4, '') END,
                youtube_url = CASE WHEN $5::TEXT IS NULL THEN youtube_url
                              ELSE NULLIF($5, '') END,
                youtube_video_id = CASE WHEN $6::TEXT IS NULL THEN youtube_video_id
                                   ELSE NULLIF($6, '') END,
                description = CASE WHEN $7::TEXT IS NULL THEN description
                              ELSE NULLIF($7, '') END,
                duration_seconds = COALESCE($8, duration_seconds),
                event_name = CASE WHEN $9::TEXT IS NULL THEN event_name
                             ELSE NULLIF($9, '') END,
                year = COALESCE($10, year),
                thumbnail_url = CASE WHEN $11::TEXT IS NULL THEN thumbnail_url
                                ELSE NULLIF($11, '') END,
                language = CASE WHEN $12::TEXT IS NULL THEN language
                           ELSE NULLIF($12, '') END,
                speaker_twitter_handle = CASE WHEN $13::TEXT IS NULL THEN speaker_twitter_handle
                                         ELSE NULLIF($13, '') END,
                speaker_bluesky_handle = CASE WHEN $14::TEXT IS NULL THEN speaker_bluesky_handle
                                         ELSE NULLIF($14, '') END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Talk>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.speaker_name)
            .bind(&input.ted_url)
            .bind(&input.youtube_url)
            .bind(&input.youtube_video_id)
            .bind(&input.description)
            .bind(input.duration_seconds)
            .bind(&input.event_name)
            .bind(input.year)
            .bind(&input.thumbnail_url)
            .bind(&input.language)
            .bind(&input.speaker_twitter_handle)
            .bind(&input.speaker_bluesky_handle)
            .fetch_optional(pool)
            .await
    }

    /// Clear the YouTube video id, used to resolve duplicate-video groups.
    pub async fn clear_youtube_video_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Talk>, sqlx::Error> {
        let query =
            format!("UPDATE talks SET youtube_video_id = NULL WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Talk>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Write the lifecycle column. `None` makes the talk active again.
    pub async fn set_lifecycle(
        pool: &PgPool,
        id: DbId,
        deleted_at: Option<Timestamp>,
    ) -> Result<Option<Talk>, sqlx::Error> {
        let query = format!("UPDATE talks SET deleted_at = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Talk>(&query)
            .bind(id)
            .bind(deleted_at)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a talk and, through the store cascade, its mappings.
    ///
    /// The talk row and the mappings about to be removed are read inside the
    /// same transaction as the delete. Returns `None` if the talk does not
    /// exist.
    pub async fn hard_delete(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<HardDeletedTalk>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM talks WHERE id = $1 FOR UPDATE");
        let Some(talk) = sqlx::query_as::<_, Talk>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let query = format!(
            "SELECT {MAPPING_COLUMNS} FROM card_talk_mappings WHERE talk_id = $1 ORDER BY id"
        );
        let cascaded_mappings = sqlx::query_as::<_, Mapping>(&query)
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM talks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(HardDeletedTalk {
            talk,
            cascaded_mappings,
        }))
    }

    /// Mappings of a talk with card display fields, primary first.
    pub async fn list_mappings_for_talk(
        pool: &PgPool,
        talk_id: DbId,
    ) -> Result<Vec<TalkCardRef>, sqlx::Error> {
        sqlx::query_as::<_, TalkCardRef>(
            "SELECT m.id AS mapping_id, c.id AS card_id, c.name AS card_name,
                    c.slug AS card_slug, c.image_url AS card_image_url,
                    m.is_primary, m.strength, m.rationale_short
             FROM card_talk_mappings m
             JOIN cards c ON c.id = m.card_id
             WHERE m.talk_id = $1
             ORDER BY m.is_primary DESC, m.strength DESC, c.sequence_index",
        )
        .bind(talk_id)
        .fetch_all(pool)
        .await
    }

    /// Talk counts for the admin dashboard. Every count except `deleted`
    /// covers active talks only.
    pub async fn stats(pool: &PgPool) -> Result<TalkStats, sqlx::Error> {
        sqlx::query_as::<_, TalkStats>(
            "SELECT
                COUNT(*) FILTER (WHERE deleted_at IS NULL) AS active,
                COUNT(*) FILTER (WHERE deleted_at IS NOT NULL) AS deleted,
                COUNT(*) FILTER (WHERE deleted_at IS NULL AND youtube_video_id IS NOT NULL)
                    AS with_youtube_id,
                COUNT(*) FILTER (
                    WHERE deleted_at IS NULL AND (thumbnail_url IS NULL OR thumbnail_url = '')
                ) AS without_thumbnail
             FROM talks",
        )
        .fetch_one(pool)
        .await
    }
}
