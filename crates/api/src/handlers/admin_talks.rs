//! Admin handlers for talks: CRUD, the lifecycle transitions, and stats.
//!
//! Unlike the public `/talks` resource these see soft-deleted talks.
//! Lifecycle transitions go through
//! [`TalkLifecycleManager`](crate::engine::TalkLifecycleManager).

use arcana_core::catalog::{patched, validate_external_urls, validate_required};
use arcana_core::error::CoreError;
use arcana_core::social::{normalize_handle, validate_handles};
use arcana_core::types::DbId;
use arcana_db::models::talk::{AdminTalk, CreateTalk, Talk, TalkDetail, TalkStats, UpdateTalk};
use arcana_db::repositories::TalkRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::engine::HardDeleteSummary;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /admin/talks`.
#[derive(Debug, Default, Deserialize)]
pub struct AdminTalkListParams {
    #[serde(default)]
    pub include_deleted: bool,
    pub q: Option<String>,
}

/// Trim an optional text field, mapping blank input to `None`.
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim a patch field, keeping blank input as `Some("")` so it clears the
/// column instead of leaving it untouched.
fn trimmed_patch(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Talk", id })
}

/// GET /api/v1/admin/talks
///
/// Newest first, with mapping counts. `?q=` filters by title, speaker or
/// description; `?include_deleted=true` adds soft-deleted talks.
pub async fn list_talks(
    State(state): State<AppState>,
    Query(params): Query<AdminTalkListParams>,
) -> AppResult<Json<DataResponse<Vec<AdminTalk>>>> {
    let talks = match trimmed(params.q) {
        Some(term) => TalkRepo::search_for_admin(&state.pool, &term, params.include_deleted).await?,
        None => TalkRepo::list_for_admin(&state.pool, params.include_deleted).await?,
    };
    Ok(Json(DataResponse { data: talks }))
}

/// POST /api/v1/admin/talks
pub async fn create_talk(
    State(state): State<AppState>,
    Json(input): Json<CreateTalk>,
) -> AppResult<(StatusCode, Json<DataResponse<Talk>>)> {
    validate_required("title", &input.title)?;
    validate_required("speaker_name", &input.speaker_name)?;

    let input = CreateTalk {
        title: input.title.trim().to_string(),
        speaker_name: input.speaker_name.trim().to_string(),
        ted_url: trimmed(input.ted_url),
        youtube_url: trimmed(input.youtube_url),
        youtube_video_id: trimmed(input.youtube_video_id),
        thumbnail_url: trimmed(input.thumbnail_url),
        speaker_twitter_handle: normalize_handle(input.speaker_twitter_handle.as_deref()),
        speaker_bluesky_handle: normalize_handle(input.speaker_bluesky_handle.as_deref()),
        ..input
    };
    validate_external_urls(input.ted_url.as_deref(), input.youtube_url.as_deref())?;
    validate_handles(
        input.speaker_twitter_handle.as_deref(),
        input.speaker_bluesky_handle.as_deref(),
    )?;

    let talk = TalkRepo::create(&state.pool, &input).await?;
    tracing::info!(talk_id = talk.id, slug = %talk.slug, "Talk created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: talk })))
}

/// GET /api/v1/admin/talks/{id}
///
/// Works for soft-deleted talks; the response carries the lifecycle state.
pub async fn get_talk(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TalkDetail>>> {
    let talk = TalkRepo::find_by_id_include_deleted(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let mappings = TalkRepo::list_mappings_for_talk(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: TalkDetail {
            lifecycle: talk.lifecycle(),
            talk,
            mappings,
        },
    }))
}

/// PUT /api/v1/admin/talks/{id}
///
/// Partial update. Absent fields are kept; a blank text field clears the
/// column. The merged row must still carry a TED or YouTube URL.
pub async fn update_talk(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTalk>,
) -> AppResult<Json<DataResponse<Talk>>> {
    let existing = TalkRepo::find_by_id_include_deleted(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(title) = &input.title {
        validate_required("title", title)?;
    }
    if let Some(speaker) = &input.speaker_name {
        validate_required("speaker_name", speaker)?;
    }

    let input = UpdateTalk {
        title: input.title.map(|t| t.trim().to_string()),
        speaker_name: input.speaker_name.map(|n| n.trim().to_string()),
        ted_url: trimmed_patch(input.ted_url),
        youtube_url: trimmed_patch(input.youtube_url),
        youtube_video_id: trimmed_patch(input.youtube_video_id),
        description: trimmed_patch(input.description),
        thumbnail_url: trimmed_patch(input.thumbnail_url),
        speaker_twitter_handle: input
            .speaker_twitter_handle
            .map(|h| normalize_handle(Some(h.as_str())).unwrap_or_default()),
        speaker_bluesky_handle: input
            .speaker_bluesky_handle
            .map(|h| normalize_handle(Some(h.as_str())).unwrap_or_default()),
        ..input
    };

    validate_external_urls(
        patched(input.ted_url.as_deref(), existing.ted_url.as_deref()),
        patched(input.youtube_url.as_deref(), existing.youtube_url.as_deref()),
    )?;
    validate_handles(
        input.speaker_twitter_handle.as_deref().filter(|h| !h.is_empty()),
        input.speaker_bluesky_handle.as_deref().filter(|h| !h.is_empty()),
    )?;

    let talk = TalkRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: talk }))
}

/// DELETE /api/v1/admin/talks/{id}
///
/// Soft delete. Mappings are kept so a restore brings them back.
pub async fn soft_delete_talk(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Talk>>> {
    let talk = state.lifecycle().soft_delete(id).await?;
    Ok(Json(DataResponse { data: talk }))
}

/// POST /api/v1/admin/talks/{id}/restore
pub async fn restore_talk(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Talk>>> {
    let talk = state.lifecycle().restore(id).await?;
    Ok(Json(DataResponse { data: talk }))
}

/// DELETE /api/v1/admin/talks/{id}/permanent
///
/// Irreversible. All mappings of the talk are removed with it.
pub async fn hard_delete_talk(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<HardDeleteSummary>>> {
    let summary = state.lifecycle().hard_delete(id).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/admin/talks/stats
pub async fn talk_stats(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<TalkStats>>> {
    let stats = TalkRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}
