//! Route definitions for `/admin/cards`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{admin_cards, themes};
use crate::state::AppState;

/// Routes mounted at `/admin/cards`.
///
/// ```text
/// GET    /                  -> list_cards (with mapping counts)
/// PUT    /{id}              -> update_card
/// GET    /{id}/mappings     -> list_card_mappings
/// PUT    /{id}/themes       -> set_card_themes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_cards::list_cards))
        .route("/{id}", put(admin_cards::update_card))
        .route("/{id}/mappings", get(admin_cards::list_card_mappings))
        .route("/{id}/themes", put(themes::set_card_themes))
}
