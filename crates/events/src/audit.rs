//! Audit fallback path for rejected mutations.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A structured diagnostic record for a mutation rejected on a business
/// rule.
///
/// Terminal: no read or query interface exists beyond test inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub source: String,
    pub detail_type: String,
    pub time: DateTime<Utc>,
    pub detail: serde_json::Value,
}

impl AuditRecord {
    /// Creates a record stamped with the current time.
    pub fn new(
        source: impl Into<String>,
        detail_type: impl Into<String>,
        detail: serde_json::Value,
    ) -> Self {
        Self {
            source: source.into(),
            detail_type: detail_type.into(),
            time: Utc::now(),
            detail,
        }
    }
}

/// One-shot, fire-and-forget emission of audit records onto a named
/// low-priority bus.
#[async_trait]
pub trait AuditBus: Send + Sync {
    /// Emits a single record.
    async fn emit(&self, record: AuditRecord) -> Result<()>;
}

/// In-memory audit bus that keeps everything it receives.
#[derive(Clone)]
pub struct InMemoryAuditBus {
    name: String,
    records: Arc<RwLock<Vec<AuditRecord>>>,
}

impl InMemoryAuditBus {
    /// Creates a named audit bus.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Returns the bus name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns every record emitted so far.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.read().unwrap().clone()
    }

    /// Returns the number of records emitted.
    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }
}

#[async_trait]
impl AuditBus for InMemoryAuditBus {
    async fn emit(&self, record: AuditRecord) -> Result<()> {
        tracing::info!(
            bus = %self.name,
            source = %record.source,
            detail_type = %record.detail_type,
            "audit record emitted"
        );
        metrics::counter!("audit_records_emitted_total").increment(1);
        self.records.write().unwrap().push(record);
        Ok(())
    }
}
