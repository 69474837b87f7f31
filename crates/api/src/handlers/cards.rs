//! Public handlers for the `/cards` resource.

use arcana_core::search::{Arcana, Suit};
use arcana_db::models::card::Card;
use arcana_db::models::mapping::MappingWithTalk;
use arcana_db::models::theme::Theme;
use arcana_db::repositories::{CardRepo, MappingRepo, ThemeRepo};
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Card page payload. Mappings to soft-deleted talks are omitted.
#[derive(Debug, Serialize)]
pub struct CardDetail {
    #[serde(flatten)]
    pub card: Card,
    pub mappings: Vec<MappingWithTalk>,
    pub featured: Option<MappingWithTalk>,
    pub themes: Vec<Theme>,
}

/// Cards drawn for a ritual spread when `count` is not given.
const DEFAULT_RITUAL_CARDS: i64 = 3;
const MAX_RITUAL_CARDS: i64 = 10;

/// Random draws must never be served from a cache.
const NO_STORE: [(header::HeaderName, &str); 1] =
    [(header::CACHE_CONTROL, "no-store, max-age=0")];

#[derive(Debug, Default, Deserialize)]
pub struct CardListParams {
    pub arcana: Option<Arcana>,
    pub suit: Option<Suit>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RitualParams {
    pub count: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RandomCard {
    pub slug: String,
}

/// A drawn card with the talk it features.
#[derive(Debug, Serialize)]
pub struct RitualCard {
    #[serde(flatten)]
    pub card: Card,
    pub featured: Option<MappingWithTalk>,
}

/// GET /api/v1/cards
///
/// Optional `arcana` and `suit` facets narrow the deck.
pub async fn list_cards(
    State(state): State<AppState>,
    Query(params): Query<CardListParams>,
) -> AppResult<Json<DataResponse<Vec<Card>>>> {
    let cards = CardRepo::list_filtered(
        &state.pool,
        params.arcana.map(Arcana::as_str),
        params.suit.map(Suit::as_str),
    )
    .await?;
    Ok(Json(DataResponse { data: cards }))
}

/// GET /api/v1/cards/random
pub async fn random_card(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let card = CardRepo::random(&state.pool, 1)
        .await?
        .pop()
        .ok_or_else(|| AppError::NotFound("No cards found".into()))?;

    Ok((
        NO_STORE,
        Json(DataResponse {
            data: RandomCard { slug: card.slug },
        }),
    ))
}

/// GET /api/v1/cards/ritual
///
/// Draws `count` distinct cards (default 3) and pairs each with its featured
/// talk. Soft-deleted talks are never featured.
pub async fn ritual_cards(
    State(state): State<AppState>,
    Query(params): Query<RitualParams>,
) -> AppResult<impl IntoResponse> {
    let count = params
        .count
        .unwrap_or(DEFAULT_RITUAL_CARDS)
        .clamp(1, MAX_RITUAL_CARDS);
    let cards = CardRepo::random(&state.pool, count).await?;
    if cards.is_empty() {
        return Err(AppError::NotFound("No cards found".into()));
    }

    let mut drawn = Vec::with_capacity(cards.len());
    for card in cards {
        let featured = MappingRepo::find_featured_for_card(&state.pool, card.id).await?;
        drawn.push(RitualCard { card, featured });
    }

    Ok((NO_STORE, Json(DataResponse { data: drawn })))
}

/// GET /api/v1/cards/{slug}
pub async fn get_card(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<CardDetail>>> {
    let card = CardRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Card '{slug}' not found")))?;

    let mappings = MappingRepo::list_for_card(&state.pool, card.id, false).await?;
    let featured = MappingRepo::find_featured_for_card(&state.pool, card.id).await?;
    let themes = ThemeRepo::list_for_card(&state.pool, card.id).await?;

    Ok(Json(DataResponse {
        data: CardDetail {
            card,
            mappings,
            featured,
            themes,
        },
    }))
}
