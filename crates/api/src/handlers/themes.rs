//! Handlers for themes and theme membership of cards and talks.

use arcana_core::catalog::{validate_required, validate_theme_category};
use arcana_core::error::CoreError;
use arcana_core::naming::slugify;
use arcana_core::types::DbId;
use arcana_db::models::card::Card;
use arcana_db::models::talk::Talk;
use arcana_db::models::theme::{CreateTheme, SetThemes, Theme, ThemeSummary};
use arcana_db::repositories::{CardRepo, TalkRepo, ThemeRepo};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Theme page payload.
#[derive(Debug, Serialize)]
pub struct ThemeDetail {
    #[serde(flatten)]
    pub theme: Theme,
    pub cards: Vec<Card>,
    /// Active talks only.
    pub talks: Vec<Talk>,
}

/// GET /api/v1/themes
pub async fn list_themes(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ThemeSummary>>>> {
    let themes = ThemeRepo::list_with_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: themes }))
}

/// GET /api/v1/themes/{slug}
pub async fn get_theme(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<ThemeDetail>>> {
    let theme = ThemeRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Theme '{slug}' not found")))?;

    let cards = CardRepo::list_for_theme(&state.pool, theme.id).await?;
    let talks = TalkRepo::list_active_for_theme(&state.pool, theme.id).await?;

    Ok(Json(DataResponse {
        data: ThemeDetail {
            theme,
            cards,
            talks,
        },
    }))
}

/// POST /api/v1/admin/themes
///
/// A blank slug is derived from the name.
pub async fn create_theme(
    State(state): State<AppState>,
    Json(input): Json<CreateTheme>,
) -> AppResult<(StatusCode, Json<DataResponse<Theme>>)> {
    validate_required("name", &input.name)?;
    validate_required("short_description", &input.short_description)?;
    validate_theme_category(input.category.as_deref())?;

    let input = CreateTheme {
        slug: if input.slug.trim().is_empty() {
            slugify(&input.name)
        } else {
            input.slug.trim().to_string()
        },
        ..input
    };
    let theme = ThemeRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: theme })))
}

/// PUT /api/v1/admin/cards/{id}/themes
pub async fn set_card_themes(
    State(state): State<AppState>,
    Path(card_id): Path<DbId>,
    Json(input): Json<SetThemes>,
) -> AppResult<Json<DataResponse<Vec<Theme>>>> {
    CardRepo::find_by_id(&state.pool, card_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Card",
            id: card_id,
        }))?;

    ThemeRepo::set_card_themes(&state.pool, card_id, &input.theme_ids).await?;
    let themes = ThemeRepo::list_for_card(&state.pool, card_id).await?;
    Ok(Json(DataResponse { data: themes }))
}

/// PUT /api/v1/admin/talks/{id}/themes
pub async fn set_talk_themes(
    State(state): State<AppState>,
    Path(talk_id): Path<DbId>,
    Json(input): Json<SetThemes>,
) -> AppResult<Json<DataResponse<Vec<Theme>>>> {
    TalkRepo::find_by_id_include_deleted(&state.pool, talk_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Talk",
            id: talk_id,
        }))?;

    ThemeRepo::set_talk_themes(&state.pool, talk_id, &input.theme_ids).await?;
    let themes = ThemeRepo::list_for_talk(&state.pool, talk_id).await?;
    Ok(Json(DataResponse { data: themes }))
}
