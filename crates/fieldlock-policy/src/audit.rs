//! Audit trail of denied operations
//!
//! Quiet denials leave no other trace, so the object mapper records every
//! non-allow decision here for debugging and compliance.

use crate::decision::{Decision, DecisionKind};
use chrono::{DateTime, Utc};
use fieldlock_core::PolicyViolation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What was attempted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Write { field: String },
    Delete,
}

/// An audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry ID
    pub id: String,

    pub timestamp: DateTime<Utc>,

    /// Model of the affected record
    pub model: String,

    /// Primary key of the affected record, if it had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<serde_json::Value>,

    pub operation: Operation,

    pub decision: DecisionKind,

    /// The violation that caused the denial
    pub violation: PolicyViolation,

    /// Who attempted the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
}

impl AuditEntry {
    /// Build an entry from a denial; `None` for an allow
    pub fn from_decision(
        model: impl Into<String>,
        operation: Operation,
        decision: &Decision,
    ) -> Option<Self> {
        let violation = decision.violation()?.clone();
        Some(Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            model: model.into(),
            record_id: None,
            operation,
            decision: decision.kind(),
            violation,
            actor: None,
        })
    }

    pub fn with_record_id(mut self, id: serde_json::Value) -> Self {
        self.record_id = Some(id);
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn is_cascade_block(&self) -> bool {
        matches!(self.violation, PolicyViolation::CascadeBlocked { .. })
    }
}

/// Bounded in-memory audit log
#[derive(Debug, Clone)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
    max_entries: usize,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::with_max_entries(10_000)
    }

    /// Create with a custom max size
    pub fn with_max_entries(max: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max,
        }
    }

    /// Log an entry, evicting the oldest ones past the limit
    pub fn log(&mut self, entry: AuditEntry) {
        self.entries.push(entry);

        if self.entries.len() > self.max_entries {
            let drain_count = self.entries.len() - self.max_entries;
            self.entries.drain(0..drain_count);
        }
    }

    /// Log a decision if it is a denial. Returns the entry ID.
    pub fn record(
        &mut self,
        model: &str,
        record_id: Option<&serde_json::Value>,
        operation: Operation,
        decision: &Decision,
    ) -> Option<String> {
        let mut entry = AuditEntry::from_decision(model, operation, decision)?;
        if let Some(id) = record_id {
            entry = entry.with_record_id(id.clone());
        }
        let id = entry.id.clone();
        self.log(entry);
        Some(id)
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn entries_since(&self, timestamp: DateTime<Utc>) -> Vec<&AuditEntry> {
        self.entries.iter().filter(|e| e.timestamp >= timestamp).collect()
    }

    pub fn entries_for_model(&self, model: &str) -> Vec<&AuditEntry> {
        self.entries.iter().filter(|e| e.model == model).collect()
    }

    pub fn rejected_entries(&self) -> Vec<&AuditEntry> {
        self.entries.iter().filter(|e| e.decision == DecisionKind::Reject).collect()
    }

    pub fn dropped_entries(&self) -> Vec<&AuditEntry> {
        self.entries.iter().filter(|e| e.decision == DecisionKind::Drop).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }

    /// Export to JSON Lines
    pub fn to_jsonl(&self) -> String {
        self.entries
            .iter()
            .filter_map(|e| serde_json::to_string(e).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn stats(&self) -> AuditStats {
        let total = self.entries.len();
        let dropped = self.dropped_entries().len();
        let rejected = self.rejected_entries().len();
        let deletes = self
            .entries
            .iter()
            .filter(|e| e.operation == Operation::Delete)
            .count();
        let cascade_blocked = self.entries.iter().filter(|e| e.is_cascade_block()).count();

        AuditStats {
            total,
            dropped,
            rejected,
            deletes,
            cascade_blocked,
            reject_rate: if total > 0 { rejected as f64 / total as f64 } else { 0.0 },
        }
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about audit entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditStats {
    pub total: usize,
    pub dropped: usize,
    pub rejected: usize,
    pub deletes: usize,
    pub cascade_blocked: usize,
    pub reject_rate: f64,
}
