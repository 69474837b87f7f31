//! Route definitions for the public `/talks` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::talks;
use crate::state::AppState;

/// Routes mounted at `/talks`.
///
/// ```text
/// GET    /            -> list_talks  (?limit=&offset=)
/// GET    /{slug}      -> get_talk
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(talks::list_talks))
        .route("/{slug}", get(talks::get_talk))
}
