//! Talk Lifecycle Manager: soft delete, restore and hard delete.
//!
//! Transitions are decided by
//! [`TalkLifecycle::apply`](arcana_core::lifecycle::TalkLifecycle::apply); this manager loads
//! the current state, persists the new one and audits hard deletes.

use std::collections::BTreeSet;
use std::sync::Arc;

use arcana_core::audit::{AuditEvent, AuditSink};
use arcana_core::error::CoreError;
use arcana_core::lifecycle::LifecycleAction;
use arcana_core::types::DbId;
use arcana_db::models::talk::Talk;
use arcana_db::repositories::TalkRepo;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;

use crate::error::AppResult;

/// What a hard delete removed. Also the payload of the
/// `TALK_HARD_DELETED` audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardDeleteSummary {
    pub talk_id: DbId,
    pub title: String,
    pub speaker_name: String,
    /// Mapping rows removed by the store cascade.
    pub cascaded_mapping_ids: Vec<DbId>,
    /// Cards whose primary mapping pointed at the deleted talk.
    pub cards_lost_primary: Vec<DbId>,
}

pub struct TalkLifecycleManager {
    pool: PgPool,
    audit: Arc<dyn AuditSink>,
}

impl TalkLifecycleManager {
    pub fn new(pool: PgPool, audit: Arc<dyn AuditSink>) -> Self {
        Self { pool, audit }
    }

    /// Hide a talk from public reads. Mappings are left untouched.
    ///
    /// Soft-deleting an already soft-deleted talk returns it unchanged.
    pub async fn soft_delete(&self, talk_id: DbId) -> AppResult<Talk> {
        self.transition(talk_id, LifecycleAction::SoftDelete).await
    }

    /// Make a soft-deleted talk visible again. Active talks are returned
    /// unchanged.
    pub async fn restore(&self, talk_id: DbId) -> AppResult<Talk> {
        self.transition(talk_id, LifecycleAction::Restore).await
    }

    /// Permanently remove a talk and, through the store cascade, its
    /// mappings. Emits `TALK_HARD_DELETED` after the delete commits.
    pub async fn hard_delete(&self, talk_id: DbId) -> AppResult<HardDeleteSummary> {
        let not_found = CoreError::NotFound {
            entity: "Talk",
            id: talk_id,
        };

        let deleted = TalkRepo::hard_delete(&self.pool, talk_id)
            .await?
            .ok_or(not_found)?;

        let cards_lost_primary: BTreeSet<DbId> = deleted
            .cascaded_mappings
            .iter()
            .filter(|m| m.is_primary)
            .map(|m| m.card_id)
            .collect();
        let summary = HardDeleteSummary {
            talk_id: deleted.talk.id,
            title: deleted.talk.title,
            speaker_name: deleted.talk.speaker_name,
            cascaded_mapping_ids: deleted.cascaded_mappings.iter().map(|m| m.id).collect(),
            cards_lost_primary: cards_lost_primary.into_iter().collect(),
        };

        tracing::info!(
            talk_id = summary.talk_id,
            cascaded = summary.cascaded_mapping_ids.len(),
            cards_lost_primary = summary.cards_lost_primary.len(),
            "Talk hard-deleted",
        );
        self.audit.record(
            AuditEvent::TalkHardDeleted,
            json!({
                "talk_id": summary.talk_id,
                "title": summary.title,
                "speaker_name": summary.speaker_name,
                "cascaded_mapping_ids": summary.cascaded_mapping_ids,
                "cards_lost_primary": summary.cards_lost_primary,
            }),
        );

        Ok(summary)
    }

    async fn transition(&self, talk_id: DbId, action: LifecycleAction) -> AppResult<Talk> {
        let not_found = || CoreError::NotFound {
            entity: "Talk",
            id: talk_id,
        };

        let talk = TalkRepo::find_by_id_include_deleted(&self.pool, talk_id)
            .await?
            .ok_or_else(not_found)?;

        let current = talk.lifecycle();
        let next = current.apply(action, Utc::now())?;
        if next == current {
            tracing::debug!(talk_id, ?action, "Lifecycle unchanged");
            return Ok(talk);
        }
        let updated = TalkRepo::set_lifecycle(&self.pool, talk_id, next.deleted_at())
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(talk_id, ?action, "Talk lifecycle changed");
        Ok(updated)
    }
}
