//! Admin handlers for card-talk mappings.
//!
//! Writes go through [`MappingManager`](crate::engine::MappingManager), which
//! enforces the one-primary-per-card rule and emits audit records.

use arcana_core::mapping::validate_mapping_fields;
use arcana_core::types::DbId;
use arcana_db::models::card::CardMappingCount;
use arcana_db::models::mapping::{
    AdminMappingRow, Mapping, MappingStats, PromotedMapping, UnmappedTalk, UpsertMapping,
};
use arcana_db::repositories::MappingRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::engine::MappingChange;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /admin/mappings/primary`.
#[derive(Debug, Deserialize)]
pub struct SetPrimaryForPair {
    pub card_id: DbId,
    pub talk_id: DbId,
}

/// GET /api/v1/admin/mappings
pub async fn list_mappings(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AdminMappingRow>>>> {
    let rows = MappingRepo::list_for_admin(&state.pool).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/admin/mappings
///
/// Creates the mapping for the (card, talk) pair or updates the existing
/// one. Responds 201 on insert and 200 on update.
pub async fn upsert_mapping(
    State(state): State<AppState>,
    Json(input): Json<UpsertMapping>,
) -> AppResult<(StatusCode, Json<DataResponse<MappingChange>>)> {
    validate_mapping_fields(input.strength, &input.rationale_short)?;

    let change = state.mappings().upsert_mapping(input).await?;
    let status = if change.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: change })))
}

/// POST /api/v1/admin/mappings/{id}/primary
pub async fn set_primary(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PromotedMapping>>> {
    let promoted = state.mappings().set_mapping_as_primary(id).await?;
    Ok(Json(DataResponse { data: promoted }))
}

/// POST /api/v1/admin/mappings/primary
pub async fn set_primary_for_pair(
    State(state): State<AppState>,
    Json(input): Json<SetPrimaryForPair>,
) -> AppResult<Json<DataResponse<PromotedMapping>>> {
    let promoted = state
        .mappings()
        .set_primary_for_pair(input.card_id, input.talk_id)
        .await?;
    Ok(Json(DataResponse { data: promoted }))
}

/// DELETE /api/v1/admin/mappings/{id}
pub async fn delete_mapping(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Mapping>>> {
    let removed = state.mappings().delete_mapping(id).await?;
    Ok(Json(DataResponse { data: removed }))
}

/// GET /api/v1/admin/mappings/stats
pub async fn mapping_stats(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MappingStats>>> {
    let stats = MappingRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/admin/mappings/unmapped-talks
pub async fn unmapped_talks(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UnmappedTalk>>>> {
    let talks = MappingRepo::list_unmapped_talks(&state.pool).await?;
    Ok(Json(DataResponse { data: talks }))
}

/// GET /api/v1/admin/mappings/cards-without-primary
pub async fn cards_without_primary(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CardMappingCount>>>> {
    let cards = MappingRepo::list_cards_without_primary(&state.pool).await?;
    Ok(Json(DataResponse { data: cards }))
}
