//! Handlers for the validation sweep and its quick fixes.

use arcana_core::catalog::{patched, validate_external_urls, validate_required};
use arcana_core::error::CoreError;
use arcana_core::types::DbId;
use arcana_db::models::talk::{Talk, UpdateTalk};
use arcana_db::repositories::TalkRepo;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ValidationParams {
    /// Return only the severity counts.
    #[serde(default)]
    pub summary: bool,
}

/// Talk fields editable through the `update_field` quick fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickField {
    Description,
    TedUrl,
    YoutubeUrl,
    Title,
    SpeakerName,
}

impl QuickField {
    pub fn as_str(self) -> &'static str {
        match self {
            QuickField::Description => "description",
            QuickField::TedUrl => "ted_url",
            QuickField::YoutubeUrl => "youtube_url",
            QuickField::Title => "title",
            QuickField::SpeakerName => "speaker_name",
        }
    }
}

/// One remediation action from the validation dashboard.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FixAction {
    ResolveDuplicateYoutube {
        talk_id: DbId,
    },
    SetPrimaryMapping {
        card_id: DbId,
        talk_id: DbId,
    },
    RestoreTalk {
        talk_id: DbId,
    },
    UpdateThumbnail {
        talk_id: DbId,
        thumbnail_url: String,
    },
    /// A null or blank `value` clears the field where the column allows it.
    UpdateField {
        talk_id: DbId,
        field: QuickField,
        value: Option<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct FixResult {
    pub action: &'static str,
    pub message: String,
}

/// GET /api/v1/admin/validation
///
/// Runs the full sweep. `?summary=true` returns only the counts.
pub async fn run_validation(
    State(state): State<AppState>,
    Query(params): Query<ValidationParams>,
) -> Response {
    let sweep = state.sweep();
    if params.summary {
        Json(DataResponse {
            data: sweep.summary().await,
        })
        .into_response()
    } else {
        Json(DataResponse {
            data: sweep.run().await,
        })
        .into_response()
    }
}

/// POST /api/v1/admin/validation/fix
///
/// The body is a JSON object tagged by `action`. Unknown actions and
/// missing fields are rejected with 400.
pub async fn apply_fix(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<DataResponse<FixResult>>> {
    let action: FixAction = serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid fix request: {e}")))?;

    let result = match action {
        FixAction::ResolveDuplicateYoutube { talk_id } => {
            TalkRepo::clear_youtube_video_id(&state.pool, talk_id)
                .await?
                .ok_or_else(|| talk_not_found(talk_id))?;
            FixResult {
                action: "resolve_duplicate_youtube",
                message: "YouTube ID removed".to_string(),
            }
        }
        FixAction::SetPrimaryMapping { card_id, talk_id } => {
            state
                .mappings()
                .set_primary_for_pair(card_id, talk_id)
                .await?;
            FixResult {
                action: "set_primary_mapping",
                message: "Primary mapping updated".to_string(),
            }
        }
        FixAction::RestoreTalk { talk_id } => {
            state.lifecycle().restore(talk_id).await?;
            FixResult {
                action: "restore_talk",
                message: "Talk restored".to_string(),
            }
        }
        FixAction::UpdateThumbnail {
            talk_id,
            thumbnail_url,
        } => {
            validate_required("thumbnail_url", &thumbnail_url)?;
            let input = UpdateTalk {
                thumbnail_url: Some(thumbnail_url.trim().to_string()),
                ..Default::default()
            };
            update_talk(&state, talk_id, &input).await?;
            FixResult {
                action: "update_thumbnail",
                message: "Thumbnail updated".to_string(),
            }
        }
        FixAction::UpdateField {
            talk_id,
            field,
            value,
        } => {
            update_field(&state, talk_id, field, value).await?;
            FixResult {
                action: "update_field",
                message: format!("{} updated", field.as_str()),
            }
        }
    };

    tracing::info!(action = result.action, "Validation fix applied");
    Ok(Json(DataResponse { data: result }))
}

fn talk_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Talk", id })
}

async fn update_talk(state: &AppState, talk_id: DbId, input: &UpdateTalk) -> AppResult<Talk> {
    TalkRepo::update(&state.pool, talk_id, input)
        .await?
        .ok_or_else(|| talk_not_found(talk_id))
}

async fn update_field(
    state: &AppState,
    talk_id: DbId,
    field: QuickField,
    value: Option<String>,
) -> AppResult<Talk> {
    let existing = TalkRepo::find_by_id_include_deleted(&state.pool, talk_id)
        .await?
        .ok_or_else(|| talk_not_found(talk_id))?;
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();

    let input = match field {
        QuickField::Description => UpdateTalk {
            description: Some(value),
            ..Default::default()
        },
        QuickField::Title => {
            validate_required("title", &value)?;
            UpdateTalk {
                title: Some(value),
                ..Default::default()
            }
        }
        QuickField::SpeakerName => {
            validate_required("speaker_name", &value)?;
            UpdateTalk {
                speaker_name: Some(value),
                ..Default::default()
            }
        }
        QuickField::TedUrl => {
            validate_external_urls(
                patched(Some(&value), existing.ted_url.as_deref()),
                existing.youtube_url.as_deref(),
            )?;
            UpdateTalk {
                ted_url: Some(value),
                ..Default::default()
            }
        }
        QuickField::YoutubeUrl => {
            validate_external_urls(
                existing.ted_url.as_deref(),
                patched(Some(&value), existing.youtube_url.as_deref()),
            )?;
            UpdateTalk {
                youtube_url: Some(value),
                ..Default::default()
            }
        }
    };

    update_talk(state, talk_id, &input).await
}
