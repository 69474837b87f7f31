//! Production audit sink.

use arcana_core::audit::{AuditEvent, AuditRecord, AuditSink};

/// Writes each audit record as one structured `tracing` event on the
/// `audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent, payload: serde_json::Value) {
        let record = AuditRecord::now(event, payload);
        tracing::info!(
            target: "audit",
            event = %record.event,
            payload = %record.payload,
            "{}",
            record.to_line(),
        );
    }
}
