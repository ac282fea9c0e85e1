//! Event recorder: derives TTL-bounded log entries from product envelopes.

use std::time::Duration;

use chrono::Utc;
use common::{ProductId, RequestId};
use domain::Money;
use entity_store::{Attributes, EntityStore, ItemKey};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::envelope::{DomainEvent, Envelope, EventType, ProductEvent};
use crate::error::Result;

/// Entity-specific details carried by a log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEventInfo {
    pub product_id: ProductId,
    pub price: Money,
}

/// An append-only event log record.
///
/// Key layout: `pk = "#product_<code>"`, `sk = "<EVENT_TYPE>#<millis>"`, so
/// sort-key lexical order is chronological per entity at millisecond
/// granularity. Events landing in the same millisecond share a sort key
/// and are unordered relative to each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLogEntry {
    pub pk: String,
    pub sk: String,
    pub email: String,
    pub created_at: i64,
    pub request_id: RequestId,
    pub event_type: EventType,
    pub info: ProductEventInfo,
    /// Absolute epoch-seconds expiry after which the store may reclaim the
    /// record. Not an enforced deletion SLA.
    pub ttl: i64,
}

/// Consumes delivered envelopes and writes log entries into the entity
/// store.
///
/// The recorder exclusively owns the event-log partition namespace.
/// Delivery is at-least-once and the recorder is not idempotent: a
/// duplicate delivery produces a duplicate entry distinguished only by
/// timestamp. There is no custom retry: a failed write is logged and left
/// to the transport's retry and dead-letter policy.
pub struct EventRecorder<S> {
    store: S,
    table: String,
    retention: Duration,
}

impl<S: EntityStore + 'static> EventRecorder<S> {
    /// Creates a recorder writing to `table` with the given retention
    /// window.
    pub fn new(store: S, table: impl Into<String>, retention: Duration) -> Self {
        Self {
            store,
            table: table.into(),
            retention,
        }
    }

    /// Handles one delivered envelope.
    ///
    /// Product envelopes become log entries; order envelopes are published
    /// only, never recorded, and are ignored here.
    #[tracing::instrument(skip(self, envelope), fields(event_type = %envelope.event_type))]
    pub async fn handle(&self, envelope: &Envelope) -> Result<()> {
        match envelope.open()? {
            DomainEvent::Product(event) => self.record(event).await,
            DomainEvent::Order(_) => {
                tracing::debug!("order envelope ignored by the recorder");
                Ok(())
            }
        }
    }

    async fn record(&self, event: ProductEvent) -> Result<()> {
        let now = Utc::now();
        let timestamp = now.timestamp_millis();

        let entry = EventLogEntry {
            pk: format!("#product_{}", event.product_code),
            sk: format!("{}#{}", event.event_type.as_str(), timestamp),
            email: event.email,
            created_at: timestamp,
            request_id: event.request_id,
            event_type: event.event_type,
            info: ProductEventInfo {
                product_id: event.product_id,
                price: event.product_price,
            },
            ttl: now.timestamp() + self.retention.as_secs() as i64,
        };

        let key = ItemKey::new(entry.pk.clone(), entry.sk.clone());
        let item = to_item(&entry)?;
        self.store.put(&self.table, key, item).await?;

        metrics::counter!("product_events_recorded_total").increment(1);
        tracing::debug!(pk = %entry.pk, sk = %entry.sk, "event recorded");
        Ok(())
    }

    /// Runs the recorder as a detached consumer over a bus subscription.
    ///
    /// The task ends when the subscription channel closes.
    pub fn spawn(self, mut rx: mpsc::Receiver<Envelope>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(envelope) = rx.recv().await {
                if let Err(error) = self.handle(&envelope).await {
                    tracing::error!(%error, "failed to record event");
                }
            }
            tracing::info!("event recorder stopped");
        })
    }
}

fn to_item(entry: &EventLogEntry) -> Result<Attributes> {
    use serde::ser::Error as _;
    match serde_json::to_value(entry)? {
        serde_json::Value::Object(map) => Ok(map),
        other => {
            Err(serde_json::Error::custom(format!("expected a JSON object, got {other}")).into())
        }
    }
}
