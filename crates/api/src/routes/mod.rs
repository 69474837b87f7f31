pub mod admin_cards;
pub mod admin_talks;
pub mod cards;
pub mod health;
pub mod mappings;
pub mod search;
pub mod talks;
pub mod themes;
pub mod validation;

use axum::Router;

use crate::state::AppState;

/// Public catalog routes, mounted at `/api/v1`.
///
/// ```text
/// /cards                                   list (deck order, ?arcana, ?suit)
/// /cards/random                            one random card slug
/// /cards/ritual                            random spread with featured talks
/// /cards/{slug}                            detail with mappings, featured talk, themes
///
/// /talks                                   list active talks (paginated)
/// /talks/{slug}                            detail with mapped cards and themes
///
/// /search                                  faceted search + suggestions
///
/// /themes                                  list with card/talk counts
/// /themes/{slug}                           detail with cards and active talks
/// ```
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .nest("/cards", cards::router())
        .nest("/talks", talks::router())
        .nest("/search", search::router())
        .nest("/themes", themes::router())
}

/// Curation routes, mounted at `/api/v1/admin`.
///
/// ```text
/// /cards                                   list with mapping counts
/// /cards/{id}                              update content fields (PUT)
/// /cards/{id}/mappings                     all mappings incl. deleted talks
/// /cards/{id}/themes                       replace theme set (PUT)
///
/// /talks                                   list/search, create
/// /talks/stats                             counts
/// /talks/{id}                              get, update, soft delete
/// /talks/{id}/restore                      restore (POST)
/// /talks/{id}/permanent                    hard delete (DELETE)
/// /talks/{id}/themes                       replace theme set (PUT)
///
/// /mappings                                list, upsert
/// /mappings/stats                          counts
/// /mappings/unmapped-talks                 active talks with no mapping
/// /mappings/cards-without-primary          cards lacking a primary
/// /mappings/primary                        promote by (card, talk) (POST)
/// /mappings/{id}/primary                   promote (POST)
/// /mappings/{id}                           delete
///
/// /themes                                  create
///
/// /validation                              run sweep (?summary=true)
/// /validation/fix                          apply a quick fix (POST)
/// ```
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .nest("/cards", admin_cards::router())
        .nest("/talks", admin_talks::router())
        .nest("/mappings", mappings::router())
        .nest("/themes", themes::admin_router())
        .nest("/validation", validation::router())
}
