//! Mapping Manager: transactional writes to card-talk mappings.
//!
//! Keeps at most one primary mapping per card. Every successful write emits
//! exactly one audit record, after the transaction has committed.

use std::sync::Arc;

use arcana_core::audit::{AuditEvent, AuditSink};
use arcana_core::error::CoreError;
use arcana_core::mapping::normalize_rationale_long;
use arcana_core::types::DbId;
use arcana_db::models::mapping::{Mapping, PromotedMapping, UpsertMapping, UpsertOutcome};
use arcana_db::repositories::MappingRepo;
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;

use crate::error::AppResult;

/// Result of a create-or-update.
#[derive(Debug, Clone, Serialize)]
pub struct MappingChange {
    pub mapping: Mapping,
    /// `true` if a new row was inserted.
    pub created: bool,
    /// Mappings of the same card that lost their primary flag.
    pub demoted_ids: Vec<DbId>,
}

pub struct MappingManager {
    pool: PgPool,
    audit: Arc<dyn AuditSink>,
}

impl MappingManager {
    pub fn new(pool: PgPool, audit: Arc<dyn AuditSink>) -> Self {
        Self { pool, audit }
    }

    /// Create or update the mapping for `(input.card_id, input.talk_id)`.
    ///
    /// Field ranges are expected to be validated by the caller. A blank long
    /// rationale is stored as `NULL`.
    pub async fn upsert_mapping(&self, input: UpsertMapping) -> AppResult<MappingChange> {
        let input = UpsertMapping {
            rationale_long: normalize_rationale_long(input.rationale_long),
            ..input
        };

        let change = match MappingRepo::upsert(&self.pool, &input).await? {
            UpsertOutcome::Created {
                mapping,
                demoted_ids,
            } => MappingChange {
                mapping,
                created: true,
                demoted_ids,
            },
            UpsertOutcome::Updated {
                mapping,
                demoted_ids,
            } => MappingChange {
                mapping,
                created: false,
                demoted_ids,
            },
            UpsertOutcome::MissingCard => {
                return Err(CoreError::NotFound {
                    entity: "Card",
                    id: input.card_id,
                }
                .into())
            }
            UpsertOutcome::MissingTalk => {
                return Err(CoreError::NotFound {
                    entity: "Talk",
                    id: input.talk_id,
                }
                .into())
            }
        };

        let m = &change.mapping;
        tracing::info!(
            mapping_id = m.id,
            card_id = m.card_id,
            talk_id = m.talk_id,
            is_primary = m.is_primary,
            created = change.created,
            demoted = change.demoted_ids.len(),
            "Mapping saved",
        );

        let event = if change.created {
            AuditEvent::MappingCreated
        } else {
            AuditEvent::MappingUpdated
        };
        self.audit.record(
            event,
            json!({
                "mapping_id": m.id,
                "card_id": m.card_id,
                "talk_id": m.talk_id,
                "is_primary": m.is_primary,
                "demoted_ids": change.demoted_ids,
            }),
        );

        Ok(change)
    }

    /// Make `mapping_id` the primary mapping of its card.
    pub async fn set_mapping_as_primary(&self, mapping_id: DbId) -> AppResult<PromotedMapping> {
        let promoted = MappingRepo::set_primary(&self.pool, mapping_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Mapping",
                id: mapping_id,
            })?;

        let m = &promoted.mapping;
        tracing::info!(
            mapping_id = m.id,
            card_id = m.card_id,
            talk_id = m.talk_id,
            demoted = promoted.demoted_ids.len(),
            "Mapping set as primary",
        );
        self.audit.record(
            AuditEvent::MappingSetPrimary,
            json!({
                "mapping_id": m.id,
                "card_id": m.card_id,
                "talk_id": m.talk_id,
                "demoted_ids": promoted.demoted_ids,
            }),
        );

        Ok(promoted)
    }

    /// Promote the existing mapping of a (card, talk) pair.
    pub async fn set_primary_for_pair(
        &self,
        card_id: DbId,
        talk_id: DbId,
    ) -> AppResult<PromotedMapping> {
        let mapping = MappingRepo::find_by_pair(&self.pool, card_id, talk_id)
            .await?
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Card {card_id} has no mapping to talk {talk_id}"
                ))
            })?;
        self.set_mapping_as_primary(mapping.id).await
    }

    /// Delete a mapping, returning the removed row.
    pub async fn delete_mapping(&self, mapping_id: DbId) -> AppResult<Mapping> {
        let removed = MappingRepo::delete(&self.pool, mapping_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Mapping",
                id: mapping_id,
            })?;

        tracing::info!(
            mapping_id = removed.id,
            card_id = removed.card_id,
            talk_id = removed.talk_id,
            was_primary = removed.is_primary,
            "Mapping deleted",
        );
        self.audit.record(
            AuditEvent::MappingDeleted,
            json!({
                "mapping_id": removed.id,
                "card_id": removed.card_id,
                "talk_id": removed.talk_id,
                "was_primary": removed.is_primary,
            }),
        );

        Ok(removed)
    }
}
