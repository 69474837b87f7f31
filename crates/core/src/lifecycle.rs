//! Talk lifecycle state machine.
//!
//! A talk is `Active`, `SoftDeleted` (hidden from public reads, recoverable)
//! or `HardDeleted` (row physically removed, terminal). The store persists
//! only `deleted_at`; this module turns that column into an explicit state
//! and decides which transitions are legal.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Lifecycle state of a talk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TalkLifecycle {
    Active,
    SoftDeleted { at: Timestamp },
    HardDeleted,
}

/// Admin action applied to a talk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    SoftDelete,
    Restore,
    HardDelete,
}

impl TalkLifecycle {
    /// Derive the state of a live row from its `deleted_at` column.
    pub fn from_deleted_at(deleted_at: Option<Timestamp>) -> Self {
        match deleted_at {
            Some(at) => TalkLifecycle::SoftDeleted { at },
            None => TalkLifecycle::Active,
        }
    }

    /// The `deleted_at` value that represents this state in storage.
    ///
    /// `HardDeleted` has no row, so it has no column value.
    pub fn deleted_at(&self) -> Option<Timestamp> {
        match self {
            TalkLifecycle::SoftDeleted { at } => Some(*at),
            TalkLifecycle::Active | TalkLifecycle::HardDeleted => None,
        }
    }

    /// Whether the talk may appear on public read paths.
    pub fn is_publicly_visible(&self) -> bool {
        matches!(self, TalkLifecycle::Active)
    }

    /// Compute the state after `action`.
    ///
    /// Soft-deleting an already soft-deleted talk keeps the original
    /// timestamp, and restoring an active talk is a no-op. Any action on a
    /// hard-deleted talk is rejected.
    pub fn apply(self, action: LifecycleAction, now: Timestamp) -> Result<Self, CoreError> {
        match (self, action) {
            (TalkLifecycle::HardDeleted, _) => Err(CoreError::Conflict(
                "Talk has been permanently deleted".to_string(),
            )),
            (TalkLifecycle::Active, LifecycleAction::SoftDelete) => {
                Ok(TalkLifecycle::SoftDeleted { at: now })
            }
            (state @ TalkLifecycle::SoftDeleted { .. }, LifecycleAction::SoftDelete) => Ok(state),
            (_, LifecycleAction::Restore) => Ok(TalkLifecycle::Active),
            (_, LifecycleAction::HardDelete) => Ok(TalkLifecycle::HardDeleted),
        }
    }
}
