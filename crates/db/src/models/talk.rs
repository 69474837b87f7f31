//! Talk entity model and DTOs.

use arcana_core::lifecycle::TalkLifecycle;
use arcana_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::mapping::Mapping;

/// A row from the `talks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Talk {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub speaker_name: String,
    pub ted_url: Option<String>,
    pub youtube_url: Option<String>,
    pub youtube_video_id: Option<String>,
    pub description: Option<String>,
    pub duration_seconds: Option<i32>,
    pub event_name: Option<String>,
    pub year: Option<i32>,
    pub thumbnail_url: Option<String>,
    pub language: Option<String>,
    pub speaker_twitter_handle: Option<String>,
    pub speaker_bluesky_handle: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Talk {
    /// Lifecycle state of this (still existing) row.
    pub fn lifecycle(&self) -> TalkLifecycle {
        TalkLifecycle::from_deleted_at(self.deleted_at)
    }
}

/// DTO for creating a new talk. The slug is generated from speaker + title.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTalk {
    pub title: String,
    pub speaker_name: String,
    pub ted_url: Option<String>,
    pub youtube_url: Option<String>,
    pub youtube_video_id: Option<String>,
    pub description: Option<String>,
    pub duration_seconds: Option<i32>,
    pub event_name: Option<String>,
    pub year: Option<i32>,
    pub thumbnail_url: Option<String>,
    pub language: Option<String>,
    pub speaker_twitter_handle: Option<String>,
    pub speaker_bluesky_handle: Option<String>,
}

/// DTO for updating an existing talk. All fields are optional; `None` keeps
/// the stored value. On nullable text columns an empty string clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTalk {
    pub title: Option<String>,
    pub speaker_name: Option<String>,
    pub ted_url: Option<String>,
    pub youtube_url: Option<String>,
    pub youtube_video_id: Option<String>,
    pub description: Option<String>,
    pub duration_seconds: Option<i32>,
    pub event_name: Option<String>,
    pub year: Option<i32>,
    pub thumbnail_url: Option<String>,
    pub language: Option<String>,
    pub speaker_twitter_handle: Option<String>,
    pub speaker_bluesky_handle: Option<String>,
}

/// Talk row plus its mapping count, for admin listings and search.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminTalk {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub talk: Talk,
    pub mappings_count: i64,
}

/// Mapping of a talk seen from the talk side, with card display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TalkCardRef {
    pub mapping_id: DbId,
    pub card_id: DbId,
    pub card_name: String,
    pub card_slug: String,
    pub card_image_url: String,
    pub is_primary: bool,
    pub strength: i16,
    pub rationale_short: String,
}

/// Admin detail view: a talk (active or soft-deleted) with its mappings.
#[derive(Debug, Clone, Serialize)]
pub struct TalkDetail {
    #[serde(flatten)]
    pub talk: Talk,
    pub lifecycle: TalkLifecycle,
    pub mappings: Vec<TalkCardRef>,
}

/// What a hard delete removed, captured inside the deleting transaction.
#[derive(Debug, Clone)]
pub struct HardDeletedTalk {
    pub talk: Talk,
    /// Mapping rows removed by the `ON DELETE CASCADE` rule.
    pub cascaded_mappings: Vec<Mapping>,
}

/// Talk counts for the admin dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TalkStats {
    pub active: i64,
    pub deleted: i64,
    pub with_youtube_id: i64,
    pub without_thumbnail: i64,
}
