//! Admin handlers for cards.

use arcana_core::error::CoreError;
use arcana_core::types::DbId;
use arcana_db::models::card::{Card, CardMappingCount, UpdateCard};
use arcana_db::models::mapping::MappingWithTalk;
use arcana_db::repositories::{CardRepo, MappingRepo};
use axum::extract::{Path, State};
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/cards
///
/// Cards in deck order with mapping counts and a `has_primary` flag.
pub async fn list_cards(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CardMappingCount>>>> {
    let cards = MappingRepo::list_cards_with_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: cards }))
}

/// PUT /api/v1/admin/cards/{id}
///
/// Updates content fields. The slug cannot be changed.
pub async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCard>,
) -> AppResult<Json<DataResponse<Card>>> {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "name cannot be blank".to_string(),
        )));
    }
    let card = CardRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Card", id }))?;
    Ok(Json(DataResponse { data: card }))
}

/// GET /api/v1/admin/cards/{id}/mappings
///
/// All mappings of a card, including those to soft-deleted talks.
pub async fn list_card_mappings(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MappingWithTalk>>>> {
    CardRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Card", id }))?;
    let mappings = MappingRepo::list_for_card(&state.pool, id, true).await?;
    Ok(Json(DataResponse { data: mappings }))
}
