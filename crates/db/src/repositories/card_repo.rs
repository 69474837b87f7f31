//! Repository for the `cards` table.

use arcana_core::types::DbId;
use sqlx::PgPool;

use crate::models::card::{Card, CreateCard, UpdateCard};

const COLUMNS: &str = "id, slug, name, arcana_type, suit, number, sequence_index, image_url, \
    keywords, summary, upright_meaning, reversed_meaning, symbolism, advice_when_drawn, \
    journaling_prompts, astrological_correspondence, numerological_significance, \
    created_at, updated_at";

/// Provides CRUD operations for tarot cards.
pub struct CardRepo;

impl CardRepo {
    /// Insert a new card, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCard) -> Result<Card, sqlx::Error> {
        let query = format!(
            "INSERT INTO cards
                (slug, name, arcana_type, suit, number, sequence_index, image_url, keywords, summary)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, '[]'), $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(&input.slug)
            .bind(&input.name)
            .bind(&input.arcana_type)
            .bind(&input.suit)
            .bind(input.number)
            .bind(input.sequence_index)
            .bind(&input.image_url)
            .bind(&input.keywords)
            .bind(&input.summary)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Card>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cards WHERE id = $1");
        sqlx::query_as::<_, Card>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Card>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cards WHERE slug = $1");
        sqlx::query_as::<_, Card>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all cards in deck order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Card>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cards ORDER BY sequence_index, id");
        sqlx::query_as::<_, Card>(&query).fetch_all(pool).await
    }

    /// Cards narrowed by arcana and suit, in deck order. `None` leaves a facet open.
    pub async fn list_filtered(
        pool: &PgPool,
        arcana_type: Option<&str>,
        suit: Option<&str>,
    ) -> Result<Vec<Card>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cards
             WHERE ($1::TEXT IS NULL OR arcana_type = $1)
               AND ($2::TEXT IS NULL OR suit = $2)
             ORDER BY sequence_index, id"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(arcana_type)
            .bind(suit)
            .fetch_all(pool)
            .await
    }

    /// Draw up to `count` distinct cards at random.
    pub async fn random(pool: &PgPool, count: i64) -> Result<Vec<Card>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cards ORDER BY RANDOM() LIMIT $1");
        sqlx::query_as::<_, Card>(&query)
            .bind(count)
            .fetch_all(pool)
            .await
    }

    /// Cards tagged with a theme, in deck order.
    pub async fn list_for_theme(pool: &PgPool, theme_id: DbId) -> Result<Vec<Card>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cards
             WHERE id IN (SELECT card_id FROM card_themes WHERE theme_id = $1)
             ORDER BY sequence_index, id"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(theme_id)
            .fetch_all(pool)
            .await
    }

    /// Update a card. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCard,
    ) -> Result<Option<Card>, sqlx::Error> {
        let query = format!(
            "UPDATE cards SET
                name = COALESCE($2, name),
                image_url = COALESCE($3, image_url),
                keywords = COALESCE($4, keywords),
                summary = COALESCE($5, summary),
                upright_meaning = COALESCE($6, upright_meaning),
                reversed_meaning = COALESCE($7, reversed_meaning),
                symbolism = COALESCE($8, symbolism),
                advice_when_drawn = COALESCE($9, advice_when_drawn),
                journaling_prompts = COALESCE($10, journaling_prompts),
                astrological_correspondence = COALESCE($11, astrological_correspondence),
                numerological_significance = COALESCE($12, numerological_significance)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.image_url)
            .bind(&input.keywords)
            .bind(&input.summary)
            .bind(&input.upright_meaning)
            .bind(&input.reversed_meaning)
            .bind(&input.symbolism)
            .bind(&input.advice_when_drawn)
            .bind(&input.journaling_prompts)
            .bind(&input.astrological_correspondence)
            .bind(&input.numerological_significance)
            .fetch_optional(pool)
            .await
    }
}
