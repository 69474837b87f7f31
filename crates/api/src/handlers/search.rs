//! Handler for `/search`.
//!
//! List-valued facets are comma separated: `?types=card,talk&suits=cups`.

use arcana_core::search::{
    Arcana, EntityType, SearchFilters, Suit, DEFAULT_SUGGESTION_LIMIT,
};
use arcana_db::models::search::{SearchPagination, SearchResults};
use arcana_db::repositories::SearchRepo;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub types: Option<String>,
    pub arcana: Option<Arcana>,
    pub suits: Option<String>,
    pub min_duration: Option<i32>,
    pub max_duration: Option<i32>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    #[serde(default)]
    pub cards_offset: i64,
    pub cards_limit: Option<i64>,
    #[serde(default)]
    pub talks_offset: i64,
    pub talks_limit: Option<i64>,
    #[serde(default)]
    pub themes_offset: i64,
    pub themes_limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub results: SearchResults,
    /// "Did you mean" candidates, only filled when nothing matched.
    pub suggestions: Vec<String>,
}

/// GET /api/v1/search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<SearchResponse>>> {
    let query = params.q.as_deref().unwrap_or("").trim().to_string();
    if query.is_empty() {
        return Err(AppError::BadRequest("Query parameter 'q' is required".into()));
    }

    let filters = SearchFilters {
        types: parse_list(params.types.as_deref(), "type", EntityType::parse)?,
        arcana: params.arcana,
        suits: parse_list(params.suits.as_deref(), "suit", Suit::parse)?,
        min_duration: params.min_duration,
        max_duration: params.max_duration,
        min_year: params.min_year,
        max_year: params.max_year,
    };
    let pagination = SearchPagination {
        cards_offset: params.cards_offset,
        cards_limit: params.cards_limit,
        talks_offset: params.talks_offset,
        talks_limit: params.talks_limit,
        themes_offset: params.themes_offset,
        themes_limit: params.themes_limit,
    };

    let results = SearchRepo::search(&state.pool, &query, &filters, pagination).await?;
    let empty = results.cards.is_empty() && results.talks.is_empty() && results.themes.is_empty();
    let suggestions = if empty {
        SearchRepo::suggestions(&state.pool, &query, DEFAULT_SUGGESTION_LIMIT).await?
    } else {
        Vec::new()
    };

    Ok(Json(DataResponse {
        data: SearchResponse {
            results,
            suggestions,
        },
    }))
}

fn parse_list<T>(
    raw: Option<&str>,
    what: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> AppResult<Vec<T>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse(s).ok_or_else(|| AppError::BadRequest(format!("Unknown {what} '{s}'"))))
        .collect()
}
