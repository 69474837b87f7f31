//! Card entity model and DTOs.

use arcana_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `cards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Card {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub arcana_type: String,
    pub suit: Option<String>,
    pub number: Option<i32>,
    pub sequence_index: i32,
    pub image_url: String,
    pub keywords: String,
    pub summary: String,
    pub upright_meaning: Option<String>,
    pub reversed_meaning: Option<String>,
    pub symbolism: Option<String>,
    pub advice_when_drawn: Option<String>,
    pub journaling_prompts: Option<String>,
    pub astrological_correspondence: Option<String>,
    pub numerological_significance: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for seeding or importing a card.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCard {
    pub slug: String,
    pub name: String,
    pub arcana_type: String,
    pub suit: Option<String>,
    pub number: Option<i32>,
    pub sequence_index: i32,
    pub image_url: String,
    pub keywords: Option<String>,
    pub summary: String,
}

/// DTO for admin edits. The slug is immutable and therefore absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCard {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub keywords: Option<String>,
    pub summary: Option<String>,
    pub upright_meaning: Option<String>,
    pub reversed_meaning: Option<String>,
    pub symbolism: Option<String>,
    pub advice_when_drawn: Option<String>,
    pub journaling_prompts: Option<String>,
    pub astrological_correspondence: Option<String>,
    pub numerological_significance: Option<String>,
}

/// Card with its mapping count and primary flag, for the admin sidebar and
/// the "cards without primary" checks.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CardMappingCount {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub arcana_type: String,
    pub suit: Option<String>,
    pub sequence_index: i32,
    pub image_url: String,
    pub mappings_count: i64,
    pub has_primary: bool,
}
