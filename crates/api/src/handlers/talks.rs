//! Public handlers for the `/talks` resource. Only active talks are visible.

use arcana_core::search::DEFAULT_TALKS_LIMIT;
use arcana_db::models::talk::{Talk, TalkCardRef};
use arcana_db::models::theme::Theme;
use arcana_db::repositories::{TalkRepo, ThemeRepo};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Upper bound for `?limit=` on the public talk listing.
const MAX_LIST_LIMIT: i64 = 100;

#[derive(Debug, Serialize)]
pub struct PublicTalkDetail {
    #[serde(flatten)]
    pub talk: Talk,
    pub cards: Vec<TalkCardRef>,
    pub themes: Vec<Theme>,
}

/// GET /api/v1/talks
pub async fn list_talks(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Talk>>>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_TALKS_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);
    let talks = TalkRepo::list_public(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: talks }))
}

/// GET /api/v1/talks/{slug}
pub async fn get_talk(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<PublicTalkDetail>>> {
    let talk = TalkRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Talk '{slug}' not found")))?;

    let cards = TalkRepo::list_mappings_for_talk(&state.pool, talk.id).await?;
    let themes = ThemeRepo::list_for_talk(&state.pool, talk.id).await?;

    Ok(Json(DataResponse {
        data: PublicTalkDetail {
            talk,
            cards,
            themes,
        },
    }))
}
