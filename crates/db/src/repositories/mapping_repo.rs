//! Repository for the `card_talk_mappings` table.
//!
//! Every write that touches the primary flag runs in one transaction that
//! first locks the owning card row, so concurrent writers for the same card
//! are serialized. The partial unique index `uq_card_talk_mappings_primary`
//! backs the one-primary-per-card rule at the store level.

use arcana_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::card::CardMappingCount;
use crate::models::mapping::{
    AdminMappingRow, Mapping, MappingStats, MappingWithTalk, PromotedMapping, UnmappedTalk,
    UpsertMapping, UpsertOutcome,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, card_id, talk_id, is_primary, strength, rationale_short, \
    rationale_long, created_at, updated_at";

/// Joined card/talk columns for the admin mappings table.
const ADMIN_COLUMNS: &str = "m.id, m.card_id, m.talk_id, m.is_primary, m.strength, \
    m.rationale_short, m.rationale_long, m.created_at, m.updated_at, \
    c.name AS card_name, c.slug AS card_slug, c.image_url AS card_image_url, \
    c.arcana_type AS card_arcana_type, c.suit AS card_suit, \
    t.title AS talk_title, t.slug AS talk_slug, t.speaker_name AS talk_speaker_name, \
    t.thumbnail_url AS talk_thumbnail_url, (t.deleted_at IS NOT NULL) AS talk_is_deleted";

/// Provides transactional writes and read helpers for card-talk mappings.
pub struct MappingRepo;

impl MappingRepo {
    // -----------------------------------------------------------------------
    // Transactional writes
    // -----------------------------------------------------------------------

    /// Create or update the mapping for a (card, talk) pair.
    ///
    /// When `input.is_primary` is set, every other primary mapping of the card
    /// is demoted in the same transaction. Missing card or talk is reported
    /// through the outcome rather than as an error.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertMapping,
    ) -> Result<UpsertOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !lock_card(&mut *tx, input.card_id).await? {
            return Ok(UpsertOutcome::MissingCard);
        }

        let talk_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM talks WHERE id = $1)")
                .bind(input.talk_id)
                .fetch_one(&mut *tx)
                .await?;
        if !talk_exists {
            return Ok(UpsertOutcome::MissingTalk);
        }

        let demoted_ids = if input.is_primary {
            demote_primaries(&mut *tx, input.card_id, input.talk_id).await?
        } else {
            Vec::new()
        };

        let existing: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM card_talk_mappings WHERE card_id = $1 AND talk_id = $2",
        )
        .bind(input.card_id)
        .bind(input.talk_id)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match existing {
            Some(id) => {
                let query = format!(
                    "UPDATE card_talk_mappings SET
                        is_primary = $2,
                        strength = $3,
                        rationale_short = $4,
                        rationale_long = $5
                     WHERE id = $1
                     RETURNING {COLUMNS}"
                );
                let mapping = sqlx::query_as::<_, Mapping>(&query)
                    .bind(id)
                    .bind(input.is_primary)
                    .bind(input.strength)
                    .bind(&input.rationale_short)
                    .bind(&input.rationale_long)
                    .fetch_one(&mut *tx)
                    .await?;
                UpsertOutcome::Updated {
                    mapping,
                    demoted_ids,
                }
            }
            None => {
                let query = format!(
                    "INSERT INTO card_talk_mappings
                        (card_id, talk_id, is_primary, strength, rationale_short, rationale_long)
                     VALUES ($1, $2, $3, $4, $5, $6)
                     RETURNING {COLUMNS}"
                );
                let mapping = sqlx::query_as::<_, Mapping>(&query)
                    .bind(input.card_id)
                    .bind(input.talk_id)
                    .bind(input.is_primary)
                    .bind(input.strength)
                    .bind(&input.rationale_short)
                    .bind(&input.rationale_long)
                    .fetch_one(&mut *tx)
                    .await?;
                UpsertOutcome::Created {
                    mapping,
                    demoted_ids,
                }
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Make a mapping the primary one for its card.
    ///
    /// Demotes the card's other primaries and promotes this mapping in one
    /// transaction. Returns `None` if the mapping does not exist.
    pub async fn set_primary(
        pool: &PgPool,
        mapping_id: DbId,
    ) -> Result<Option<PromotedMapping>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let card_id: Option<DbId> =
            sqlx::query_scalar("SELECT card_id FROM card_talk_mappings WHERE id = $1")
                .bind(mapping_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(card_id) = card_id else {
            return Ok(None);
        };
        lock_card(&mut *tx, card_id).await?;

        let demoted_ids: Vec<DbId> = sqlx::query_scalar(
            "UPDATE card_talk_mappings SET is_primary = false
             WHERE card_id = $1 AND id <> $2 AND is_primary
             RETURNING id",
        )
        .bind(card_id)
        .bind(mapping_id)
        .fetch_all(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE card_talk_mappings SET is_primary = true
             WHERE id = $1 AND card_id = $2
             RETURNING {COLUMNS}"
        );
        let Some(mapping) = sqlx::query_as::<_, Mapping>(&query)
            .bind(mapping_id)
            .bind(card_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            // Deleted between the lookup and the lock; dropping rolls back.
            return Ok(None);
        };

        tx.commit().await?;
        Ok(Some(PromotedMapping {
            mapping,
            demoted_ids,
        }))
    }

    /// Delete a mapping, returning the removed row.
    pub async fn delete(pool: &PgPool, mapping_id: DbId) -> Result<Option<Mapping>, sqlx::Error> {
        let query = format!("DELETE FROM card_talk_mappings WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Mapping>(&query)
            .bind(mapping_id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Mapping>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM card_talk_mappings WHERE id = $1");
        sqlx::query_as::<_, Mapping>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_pair(
        pool: &PgPool,
        card_id: DbId,
        talk_id: DbId,
    ) -> Result<Option<Mapping>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM card_talk_mappings WHERE card_id = $1 AND talk_id = $2"
        );
        sqlx::query_as::<_, Mapping>(&query)
            .bind(card_id)
            .bind(talk_id)
            .fetch_optional(pool)
            .await
    }

    /// The card's current primary mapping, if any.
    pub async fn find_primary_for_card(
        pool: &PgPool,
        card_id: DbId,
    ) -> Result<Option<Mapping>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM card_talk_mappings WHERE card_id = $1 AND is_primary");
        sqlx::query_as::<_, Mapping>(&query)
            .bind(card_id)
            .fetch_optional(pool)
            .await
    }

    /// Mappings of one card, primary first, then by strength.
    ///
    /// Public card pages pass `include_deleted_talks = false`.
    pub async fn list_for_card(
        pool: &PgPool,
        card_id: DbId,
        include_deleted_talks: bool,
    ) -> Result<Vec<MappingWithTalk>, sqlx::Error> {
        sqlx::query_as::<_, MappingWithTalk>(
            "SELECT m.id, m.card_id, m.talk_id, m.is_primary, m.strength,
                    m.rationale_short, m.rationale_long, m.created_at,
                    t.title AS talk_title, t.slug AS talk_slug,
                    t.speaker_name AS talk_speaker_name,
                    t.thumbnail_url AS talk_thumbnail_url, t.year AS talk_year,
                    (t.deleted_at IS NOT NULL) AS talk_is_deleted
             FROM card_talk_mappings m
             JOIN talks t ON t.id = m.talk_id
             WHERE m.card_id = $1 AND ($2 OR t.deleted_at IS NULL)
             ORDER BY m.is_primary DESC, m.strength DESC, m.id",
        )
        .bind(card_id)
        .bind(include_deleted_talks)
        .fetch_all(pool)
        .await
    }

    /// The mapping a renderer should feature for a card: its primary, else
    /// its strongest mapping. Only active talks qualify.
    pub async fn find_featured_for_card(
        pool: &PgPool,
        card_id: DbId,
    ) -> Result<Option<MappingWithTalk>, sqlx::Error> {
        let mut mappings = Self::list_for_card(pool, card_id, false).await?;
        if mappings.is_empty() {
            return Ok(None);
        }
        Ok(Some(mappings.swap_remove(0)))
    }

    /// All mappings for the admin table, in deck order.
    pub async fn list_for_admin(pool: &PgPool) -> Result<Vec<AdminMappingRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ADMIN_COLUMNS}
             FROM card_talk_mappings m
             JOIN cards c ON c.id = m.card_id
             JOIN talks t ON t.id = m.talk_id
             ORDER BY c.sequence_index, m.is_primary DESC, m.strength DESC, m.id"
        );
        sqlx::query_as::<_, AdminMappingRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Every card with its mapping count and primary flag, in deck order.
    pub async fn list_cards_with_counts(
        pool: &PgPool,
    ) -> Result<Vec<CardMappingCount>, sqlx::Error> {
        sqlx::query_as::<_, CardMappingCount>(
            "SELECT c.id, c.slug, c.name, c.arcana_type, c.suit, c.sequence_index, c.image_url,
                    COUNT(m.id) AS mappings_count,
                    COALESCE(BOOL_OR(m.is_primary), false) AS has_primary
             FROM cards c
             LEFT JOIN card_talk_mappings m ON m.card_id = c.id
             GROUP BY c.id
             ORDER BY c.sequence_index, c.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Cards that have no primary mapping, with their total mapping count.
    pub async fn list_cards_without_primary(
        pool: &PgPool,
    ) -> Result<Vec<CardMappingCount>, sqlx::Error> {
        sqlx::query_as::<_, CardMappingCount>(
            "SELECT c.id, c.slug, c.name, c.arcana_type, c.suit, c.sequence_index, c.image_url,
                    (SELECT COUNT(*) FROM card_talk_mappings m WHERE m.card_id = c.id)
                        AS mappings_count,
                    false AS has_primary
             FROM cards c
             WHERE NOT EXISTS (
                 SELECT 1 FROM card_talk_mappings m WHERE m.card_id = c.id AND m.is_primary
             )
             ORDER BY c.sequence_index, c.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Active talks that no mapping references, newest first.
    pub async fn list_unmapped_talks(pool: &PgPool) -> Result<Vec<UnmappedTalk>, sqlx::Error> {
        sqlx::query_as::<_, UnmappedTalk>(
            "SELECT t.id, t.slug, t.title, t.speaker_name, t.thumbnail_url, t.year
             FROM talks t
             WHERE t.deleted_at IS NULL
               AND NOT EXISTS (SELECT 1 FROM card_talk_mappings m WHERE m.talk_id = t.id)
             ORDER BY t.created_at DESC, t.id DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Aggregate counts for the admin dashboard.
    pub async fn stats(pool: &PgPool) -> Result<MappingStats, sqlx::Error> {
        let (total_mappings, total_cards, cards_with_primary, unmapped_talks): (
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM card_talk_mappings),
                (SELECT COUNT(*) FROM cards),
                (SELECT COUNT(DISTINCT card_id) FROM card_talk_mappings WHERE is_primary),
                (SELECT COUNT(*) FROM talks t
                 WHERE t.deleted_at IS NULL
                   AND NOT EXISTS (SELECT 1 FROM card_talk_mappings m WHERE m.talk_id = t.id))",
        )
        .fetch_one(pool)
        .await?;

        Ok(MappingStats {
            total_mappings,
            total_cards,
            cards_with_primary,
            cards_without_primary: total_cards - cards_with_primary,
            unmapped_talks,
        })
    }
}

/// Lock the card row for the rest of the transaction. Returns `false` if the
/// card does not exist.
async fn lock_card(conn: &mut PgConnection, card_id: DbId) -> Result<bool, sqlx::Error> {
    let locked: Option<DbId> = sqlx::query_scalar("SELECT id FROM cards WHERE id = $1 FOR UPDATE")
        .bind(card_id)
        .fetch_optional(conn)
        .await?;
    Ok(locked.is_some())
}

/// Clear the primary flag on every mapping of `card_id` except the one for
/// `keep_talk_id`. Returns the demoted mapping ids.
async fn demote_primaries(
    conn: &mut PgConnection,
    card_id: DbId,
    keep_talk_id: DbId,
) -> Result<Vec<DbId>, sqlx::Error> {
    sqlx::query_scalar(
        "UPDATE card_talk_mappings SET is_primary = false
         WHERE card_id = $1 AND talk_id <> $2 AND is_primary
         RETURNING id",
    )
    .bind(card_id)
    .bind(keep_talk_id)
    .fetch_all(conn)
    .await
}
