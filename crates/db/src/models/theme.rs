//! Theme entity model and DTOs.

use arcana_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `themes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Theme {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub short_description: String,
    pub long_description: Option<String>,
    pub category: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Theme list entry with membership counts. Soft-deleted talks are not counted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ThemeSummary {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub short_description: String,
    pub category: Option<String>,
    pub cards_count: i64,
    pub talks_count: i64,
}

/// DTO for creating a new theme. A blank slug is derived from the name.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTheme {
    #[serde(default)]
    pub slug: String,
    pub name: String,
    pub short_description: String,
    pub long_description: Option<String>,
    pub category: Option<String>,
}

/// Replacement theme set for a card or talk.
#[derive(Debug, Clone, Deserialize)]
pub struct SetThemes {
    pub theme_ids: Vec<DbId>,
}
