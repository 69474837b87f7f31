//! Search result rows.

use arcana_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CardHit {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub summary: String,
    pub keywords: String,
    pub image_url: String,
    pub arcana_type: String,
    pub suit: Option<String>,
}

/// Talk search hit. Only active talks are ever returned.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TalkHit {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub speaker_name: String,
    pub ted_url: Option<String>,
    pub youtube_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub year: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ThemeHit {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
}

/// Per-entity pagination for a search request.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchPagination {
    pub cards_offset: i64,
    pub cards_limit: Option<i64>,
    pub talks_offset: i64,
    pub talks_limit: Option<i64>,
    pub themes_offset: i64,
    pub themes_limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub cards: Vec<CardHit>,
    pub talks: Vec<TalkHit>,
    pub themes: Vec<ThemeHit>,
    pub has_more_cards: bool,
    pub has_more_talks: bool,
    pub has_more_themes: bool,
}
