//! Root-level liveness and schema status.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when the database is reachable and fully migrated, else `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Newest migration applied to the connected database.
    pub schema_version: Option<i64>,
    /// Newest migration this binary ships.
    pub expected_schema_version: Option<i64>,
    pub schema_current: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let schema_version = arcana_db::applied_schema_version(&state.pool)
        .await
        .inspect_err(|e| {
            tracing::warn!(error = %e, "Health check could not read schema version");
        });
    let db_healthy = schema_version.is_ok();
    let schema_version = schema_version.ok().flatten();
    let expected_schema_version = arcana_db::latest_migration_version();
    let schema_current = db_healthy && schema_version >= expected_schema_version;

    Json(HealthResponse {
        status: if schema_current { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        schema_version,
        expected_schema_version,
        schema_current,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
