//! Faceted free-text search over cards, talks and themes.
//!
//! Candidates are fetched with `ILIKE`, over-fetched by
//! `SCORING_BUFFER` rows, then ranked in memory with the scoring functions
//! from `arcana_core::search` before the page is cut. Talks are always
//! restricted to active rows.

use arcana_core::search::{
    candidate_window, clamp_limit, clamp_offset, rank_page, score_card, score_talk, score_theme,
    suggest, EntityType, SearchFilters, DEFAULT_CARDS_LIMIT, DEFAULT_TALKS_LIMIT,
    DEFAULT_THEMES_LIMIT,
};
use sqlx::PgPool;

use crate::models::search::{CardHit, SearchPagination, SearchResults, TalkHit, ThemeHit};

/// Candidate rows read for "did you mean" suggestions.
const SUGGESTION_CARD_POOL: i64 = 20;
const SUGGESTION_TALK_POOL: i64 = 50;

pub struct SearchRepo;

impl SearchRepo {
    /// Run a search across every entity type the filters include.
    pub async fn search(
        pool: &PgPool,
        query: &str,
        filters: &SearchFilters,
        pagination: SearchPagination,
    ) -> Result<SearchResults, sqlx::Error> {
        let q = query.trim();
        let term = format!("%{q}%");

        let (cards, has_more_cards) = if filters.includes(EntityType::Card) {
            Self::search_cards(pool, q, &term, filters, pagination).await?
        } else {
            (Vec::new(), false)
        };
        let (talks, has_more_talks) = if filters.includes(EntityType::Talk) {
            Self::search_talks(pool, q, &term, filters, pagination).await?
        } else {
            (Vec::new(), false)
        };
        let (themes, has_more_themes) = if filters.includes(EntityType::Theme) {
            Self::search_themes(pool, q, &term, pagination).await?
        } else {
            (Vec::new(), false)
        };

        Ok(SearchResults {
            query: q.to_string(),
            cards,
            talks,
            themes,
            has_more_cards,
            has_more_talks,
            has_more_themes,
        })
    }

    async fn search_cards(
        pool: &PgPool,
        q: &str,
        term: &str,
        filters: &SearchFilters,
        pagination: SearchPagination,
    ) -> Result<(Vec<CardHit>, bool), sqlx::Error> {
        let offset = clamp_offset(pagination.cards_offset);
        let limit = clamp_limit(pagination.cards_limit, DEFAULT_CARDS_LIMIT);
        let suits: Vec<String> = filters.suits.iter().map(|s| s.as_str().to_string()).collect();

        let rows = sqlx::query_as::<_, CardHit>(
            "SELECT id, slug, name, summary, keywords, image_url, arcana_type, suit
             FROM cards
             WHERE (name ILIKE $1 OR keywords ILIKE $1 OR summary ILIKE $1
                    OR upright_meaning ILIKE $1 OR reversed_meaning ILIKE $1)
               AND ($2::TEXT IS NULL OR arcana_type = $2)
               AND (CARDINALITY($3::TEXT[]) = 0 OR suit = ANY($3))
             ORDER BY sequence_index
             LIMIT $4",
        )
        .bind(term)
        .bind(filters.arcana.map(|a| a.as_str()))
        .bind(&suits)
        .bind(candidate_window(offset, limit))
        .fetch_all(pool)
        .await?;

        let scored = rows
            .into_iter()
            .map(|c| (score_card(&c.name, &c.keywords, &c.summary, q), c))
            .collect();
        Ok(rank_page(scored, offset, limit))
    }

    async fn search_talks(
        pool: &PgPool,
        q: &str,
        term: &str,
        filters: &SearchFilters,
        pagination: SearchPagination,
    ) -> Result<(Vec<TalkHit>, bool), sqlx::Error> {
        let offset = clamp_offset(pagination.talks_offset);
        let limit = clamp_limit(pagination.talks_limit, DEFAULT_TALKS_LIMIT);

        let rows = sqlx::query_as::<_, TalkHit>(
            "SELECT id, slug, title, speaker_name, ted_url, youtube_url, duration_seconds,
                    year, description
             FROM talks
             WHERE deleted_at IS NULL
               AND (title ILIKE $1 OR speaker_name ILIKE $1 OR description ILIKE $1)
               AND ($2::INT IS NULL OR duration_seconds >= $2)
               AND ($3::INT IS NULL OR duration_seconds <= $3)
               AND ($4::INT IS NULL OR year >= $4)
               AND ($5::INT IS NULL OR year <= $5)
             ORDER BY created_at DESC
             LIMIT $6",
        )
        .bind(term)
        .bind(filters.min_duration)
        .bind(filters.max_duration)
        .bind(filters.min_year)
        .bind(filters.max_year)
        .bind(candidate_window(offset, limit))
        .fetch_all(pool)
        .await?;

        let scored = rows
            .into_iter()
            .map(|t| {
                let score = score_talk(&t.title, &t.speaker_name, t.description.as_deref(), q);
                (score, t)
            })
            .collect();
        Ok(rank_page(scored, offset, limit))
    }

    async fn search_themes(
        pool: &PgPool,
        q: &str,
        term: &str,
        pagination: SearchPagination,
    ) -> Result<(Vec<ThemeHit>, bool), sqlx::Error> {
        let offset = clamp_offset(pagination.themes_offset);
        let limit = clamp_limit(pagination.themes_limit, DEFAULT_THEMES_LIMIT);

        let rows = sqlx::query_as::<_, ThemeHit>(
            "SELECT id, slug, name, short_description AS description
             FROM themes
             WHERE name ILIKE $1 OR short_description ILIKE $1 OR long_description ILIKE $1
             ORDER BY name
             LIMIT $2",
        )
        .bind(term)
        .bind(candidate_window(offset, limit))
        .fetch_all(pool)
        .await?;

        let scored = rows
            .into_iter()
            .map(|t| (score_theme(&t.name, t.description.as_deref(), q), t))
            .collect();
        Ok(rank_page(scored, offset, limit))
    }

    /// "Did you mean" candidates drawn from card names, theme names and the
    /// words of active talk titles.
    pub async fn suggestions(
        pool: &PgPool,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, sqlx::Error> {
        let mut names: Vec<String> =
            sqlx::query_scalar("SELECT name FROM cards ORDER BY sequence_index LIMIT $1")
                .bind(SUGGESTION_CARD_POOL)
                .fetch_all(pool)
                .await?;
        let titles: Vec<String> = sqlx::query_scalar(
            "SELECT title FROM talks WHERE deleted_at IS NULL ORDER BY created_at DESC LIMIT $1",
        )
        .bind(SUGGESTION_TALK_POOL)
        .fetch_all(pool)
        .await?;
        let themes: Vec<String> = sqlx::query_scalar("SELECT name FROM themes ORDER BY name")
            .fetch_all(pool)
            .await?;
        names.extend(themes);

        Ok(suggest(query, &names, &titles, limit))
    }
}
