//! Route definitions for the public `/cards` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::cards;
use crate::state::AppState;

/// Routes mounted at `/cards`.
///
/// ```text
/// GET    /            -> list_cards (?arcana, ?suit)
/// GET    /random      -> random_card
/// GET    /ritual      -> ritual_cards (?count)
/// GET    /{slug}      -> get_card
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cards::list_cards))
        .route("/random", get(cards::random_card))
        .route("/ritual", get(cards::ritual_cards))
        .route("/{slug}", get(cards::get_card))
}
