use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::model::{EmployeeId, TenantId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub tenant_id: TenantId,
    pub actor_id: EmployeeId,
    pub action: String,
    pub resource_type: &'static str,
    pub resource_id: String,
    pub details: Value,
    pub timestamp: DateTime<Utc>,
}

/// Append-only, best-effort record of committed transitions.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry) -> anyhow::Result<()>;
}

/// Emits each entry as a structured log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: AuditEntry) -> anyhow::Result<()> {
        info!(
            target: "audit",
            tenant = %entry.tenant_id,
            actor = %entry.actor_id,
            action = %entry.action,
            resource_type = entry.resource_type,
            resource_id = %entry.resource_id,
            details = %entry.details,
            at = %entry.timestamp,
            "audit entry"
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, entry: AuditEntry) -> anyhow::Result<()> {
        self.entries.lock().push(entry);
        Ok(())
    }
}
