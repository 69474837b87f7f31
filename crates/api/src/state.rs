use std::sync::Arc;

use arcana_core::audit::AuditSink;

use crate::config::ServerConfig;
use crate::engine::{MappingManager, TalkLifecycleManager, ValidationSweep};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: arcana_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Destination for audit records of mapping and lifecycle changes.
    pub audit: Arc<dyn AuditSink>,
}

impl AppState {
    pub fn new(pool: arcana_db::DbPool, config: ServerConfig, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            audit,
        }
    }

    /// The only writer of mapping rows.
    pub fn mappings(&self) -> MappingManager {
        MappingManager::new(self.pool.clone(), Arc::clone(&self.audit))
    }

    /// The only writer of talk lifecycle state.
    pub fn lifecycle(&self) -> TalkLifecycleManager {
        TalkLifecycleManager::new(self.pool.clone(), Arc::clone(&self.audit))
    }

    pub fn sweep(&self) -> ValidationSweep {
        ValidationSweep::new(self.pool.clone(), self.config.storage_public_url.clone())
    }
}
