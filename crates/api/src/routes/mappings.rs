//! Route definitions for `/admin/mappings`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::mappings;
use crate::state::AppState;

/// Routes mounted at `/admin/mappings`.
///
/// ```text
/// GET    /                          -> list_mappings
/// POST   /                          -> upsert_mapping
/// GET    /stats                     -> mapping_stats
/// GET    /unmapped-talks            -> unmapped_talks
/// GET    /cards-without-primary     -> cards_without_primary
/// POST   /primary                   -> set_primary_for_pair
/// POST   /{id}/primary              -> set_primary
/// DELETE /{id}                      -> delete_mapping
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(mappings::list_mappings).post(mappings::upsert_mapping),
        )
        .route("/stats", get(mappings::mapping_stats))
        .route("/unmapped-talks", get(mappings::unmapped_talks))
        .route("/cards-without-primary", get(mappings::cards_without_primary))
        .route("/primary", post(mappings::set_primary_for_pair))
        .route("/{id}/primary", post(mappings::set_primary))
        .route("/{id}", delete(mappings::delete_mapping))
}
