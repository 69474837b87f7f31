//! Route definitions for `/admin/validation`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::validation;
use crate::state::AppState;

/// Routes mounted at `/admin/validation`.
///
/// ```text
/// GET    /            -> run_validation  (?summary=true)
/// POST   /fix         -> apply_fix
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(validation::run_validation))
        .route("/fix", post(validation::apply_fix))
}
