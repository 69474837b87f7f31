//! Audit trail contract for state-changing catalog operations.
//!
//! Every mapping create/update/delete/promotion and every talk hard delete
//! produces one [`AuditRecord`]. Records go to an injected [`AuditSink`];
//! the sink is append-only and never read back by the engine.

use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Event tags
// ---------------------------------------------------------------------------

/// Tag identifying the kind of change an audit record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEvent {
    MappingCreated,
    MappingUpdated,
    MappingSetPrimary,
    MappingDeleted,
    TalkHardDeleted,
}

impl AuditEvent {
    /// Wire tag written into the audit line.
    pub fn as_str(self) -> &'static str {
        match self {
            AuditEvent::MappingCreated => "MAPPING_CREATED",
            AuditEvent::MappingUpdated => "MAPPING_UPDATED",
            AuditEvent::MappingSetPrimary => "MAPPING_SET_PRIMARY",
            AuditEvent::MappingDeleted => "MAPPING_DELETED",
            AuditEvent::TalkHardDeleted => "TALK_HARD_DELETED",
        }
    }
}

impl std::fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records and sinks
// ---------------------------------------------------------------------------

/// One immutable audit entry.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub timestamp: Timestamp,
    pub event: AuditEvent,
    pub payload: serde_json::Value,
}

impl AuditRecord {
    /// Stamp a new record with the current UTC time.
    pub fn now(event: AuditEvent, payload: serde_json::Value) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
            payload,
        }
    }

    /// Render as a single line: `[AUDIT] <rfc3339> | <EVENT> | <json>`.
    pub fn to_line(&self) -> String {
        format!(
            "[AUDIT] {} | {} | {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.event,
            self.payload
        )
    }
}

/// Append-only destination for audit records.
///
/// Implementations must not fail the calling operation; a sink that cannot
/// persist a record is expected to report the problem through its own
/// channel.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent, payload: serde_json::Value);
}

/// Sink that keeps every record in memory. Used by tests and tooling that
/// need to inspect what an operation emitted.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records emitted so far, oldest first.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Event tags emitted so far, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.records().into_iter().map(|r| r.event).collect()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: AuditEvent, payload: serde_json::Value) {
        if let Ok(mut records) = self.records.lock() {
            records.push(AuditRecord::now(event, payload));
        }
    }
}
