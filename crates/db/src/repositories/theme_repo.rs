//! Repository for the `themes` table and its card/talk membership tables.

use arcana_core::types::DbId;
use sqlx::PgPool;

use crate::models::theme::{CreateTheme, Theme, ThemeSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, slug, name, short_description, long_description, category, created_at, updated_at";

const TH_COLUMNS: &str = "th.id, th.slug, th.name, th.short_description, th.long_description, \
    th.category, th.created_at, th.updated_at";

pub struct ThemeRepo;

impl ThemeRepo {
    pub async fn create(pool: &PgPool, input: &CreateTheme) -> Result<Theme, sqlx::Error> {
        let query = format!(
            "INSERT INTO themes (slug, name, short_description, long_description, category)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Theme>(&query)
            .bind(&input.slug)
            .bind(&input.name)
            .bind(&input.short_description)
            .bind(&input.long_description)
            .bind(&input.category)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Theme>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM themes WHERE slug = $1");
        sqlx::query_as::<_, Theme>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// All themes with how many cards and active talks carry each one.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<ThemeSummary>, sqlx::Error> {
        sqlx::query_as::<_, ThemeSummary>(
            "SELECT th.id, th.slug, th.name, th.short_description, th.category,
                    (SELECT COUNT(*) FROM card_themes ct WHERE ct.theme_id = th.id)
                        AS cards_count,
                    (SELECT COUNT(*) FROM talk_themes tt
                     JOIN talks t ON t.id = tt.talk_id
                     WHERE tt.theme_id = th.id AND t.deleted_at IS NULL) AS talks_count
             FROM themes th
             ORDER BY th.name, th.id",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn list_for_card(pool: &PgPool, card_id: DbId) -> Result<Vec<Theme>, sqlx::Error> {
        let query = format!(
            "SELECT {TH_COLUMNS} FROM themes th
             JOIN card_themes ct ON ct.theme_id = th.id
             WHERE ct.card_id = $1
             ORDER BY th.name, th.id"
        );
        sqlx::query_as::<_, Theme>(&query)
            .bind(card_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_talk(pool: &PgPool, talk_id: DbId) -> Result<Vec<Theme>, sqlx::Error> {
        let query = format!(
            "SELECT {TH_COLUMNS} FROM themes th
             JOIN talk_themes tt ON tt.theme_id = th.id
             WHERE tt.talk_id = $1
             ORDER BY th.name, th.id"
        );
        sqlx::query_as::<_, Theme>(&query)
            .bind(talk_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a card's theme set. Unknown theme ids fail the foreign key and
    /// roll the whole replacement back.
    pub async fn set_card_themes(
        pool: &PgPool,
        card_id: DbId,
        theme_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM card_themes WHERE card_id = $1")
            .bind(card_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO card_themes (card_id, theme_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(card_id)
        .bind(theme_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Replace a talk's theme set in one transaction.
    pub async fn set_talk_themes(
        pool: &PgPool,
        talk_id: DbId,
        theme_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM talk_themes WHERE talk_id = $1")
            .bind(talk_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO talk_themes (talk_id, theme_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(talk_id)
        .bind(theme_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
