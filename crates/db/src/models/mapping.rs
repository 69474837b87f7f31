//! Card-talk mapping model and DTOs.

use arcana_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `card_talk_mappings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Mapping {
    pub id: DbId,
    pub card_id: DbId,
    pub talk_id: DbId,
    pub is_primary: bool,
    pub strength: i16,
    pub rationale_short: String,
    pub rationale_long: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or updating the mapping of a (card, talk) pair.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertMapping {
    pub card_id: DbId,
    pub talk_id: DbId,
    #[serde(default)]
    pub is_primary: bool,
    pub strength: i16,
    pub rationale_short: String,
    pub rationale_long: Option<String>,
}

/// Result of [`MappingRepo::upsert`](crate::repositories::MappingRepo::upsert).
#[derive(Debug, Clone)]
pub enum UpsertOutcome {
    Created {
        mapping: Mapping,
        demoted_ids: Vec<DbId>,
    },
    Updated {
        mapping: Mapping,
        demoted_ids: Vec<DbId>,
    },
    MissingCard,
    MissingTalk,
}

/// Result of a successful primary promotion.
#[derive(Debug, Clone, Serialize)]
pub struct PromotedMapping {
    pub mapping: Mapping,
    /// Mappings of the same card that lost their primary flag.
    pub demoted_ids: Vec<DbId>,
}

/// A mapping of one card joined with its talk's display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MappingWithTalk {
    pub id: DbId,
    pub card_id: DbId,
    pub talk_id: DbId,
    pub is_primary: bool,
    pub strength: i16,
    pub rationale_short: String,
    pub rationale_long: Option<String>,
    pub created_at: Timestamp,
    pub talk_title: String,
    pub talk_slug: String,
    pub talk_speaker_name: String,
    pub talk_thumbnail_url: Option<String>,
    pub talk_year: Option<i32>,
    pub talk_is_deleted: bool,
}

/// One row of the admin mappings table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminMappingRow {
    pub id: DbId,
    pub card_id: DbId,
    pub talk_id: DbId,
    pub is_primary: bool,
    pub strength: i16,
    pub rationale_short: String,
    pub rationale_long: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub card_name: String,
    pub card_slug: String,
    pub card_image_url: String,
    pub card_arcana_type: String,
    pub card_suit: Option<String>,
    pub talk_title: String,
    pub talk_slug: String,
    pub talk_speaker_name: String,
    pub talk_thumbnail_url: Option<String>,
    pub talk_is_deleted: bool,
}

/// Active talk that no mapping references.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UnmappedTalk {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub speaker_name: String,
    pub thumbnail_url: Option<String>,
    pub year: Option<i32>,
}

/// Aggregate mapping counts for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct MappingStats {
    pub total_mappings: i64,
    pub total_cards: i64,
    pub cards_with_primary: i64,
    pub cards_without_primary: i64,
    pub unmapped_talks: i64,
}
