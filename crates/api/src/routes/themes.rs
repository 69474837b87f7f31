//! Route definitions for themes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::themes;
use crate::state::AppState;

/// Public routes mounted at `/themes`.
///
/// ```text
/// GET    /            -> list_themes
/// GET    /{slug}      -> get_theme
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(themes::list_themes))
        .route("/{slug}", get(themes::get_theme))
}

/// Admin routes mounted at `/admin/themes`.
///
/// ```text
/// POST   /            -> create_theme
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/", post(themes::create_theme))
}
