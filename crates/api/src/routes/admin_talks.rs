//! Route definitions for `/admin/talks`.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{admin_talks, themes};
use crate::state::AppState;

/// Routes mounted at `/admin/talks`.
///
/// ```text
/// GET    /                  -> list_talks  (?q=&include_deleted=)
/// POST   /                  -> create_talk
/// GET    /stats             -> talk_stats
/// GET    /{id}              -> get_talk
/// PUT    /{id}              -> update_talk
/// DELETE /{id}              -> soft_delete_talk
/// POST   /{id}/restore      -> restore_talk
/// DELETE /{id}/permanent    -> hard_delete_talk
/// PUT    /{id}/themes       -> set_talk_themes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(admin_talks::list_talks).post(admin_talks::create_talk),
        )
        .route("/stats", get(admin_talks::talk_stats))
        .route(
            "/{id}",
            get(admin_talks::get_talk)
                .put(admin_talks::update_talk)
                .delete(admin_talks::soft_delete_talk),
        )
        .route("/{id}/restore", post(admin_talks::restore_talk))
        .route("/{id}/permanent", delete(admin_talks::hard_delete_talk))
        .route("/{id}/themes", put(themes::set_talk_themes))
}
