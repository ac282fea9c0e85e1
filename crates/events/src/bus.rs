//! Event bus contract and in-memory transport.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::MessageId;
use tokio::sync::mpsc;

use crate::envelope::{Envelope, EventType};
use crate::error::{EventError, Result};

/// Delivery attempts per subscriber before an envelope is dead-lettered.
const MAX_DELIVERY_ATTEMPTS: u32 = 3;

/// Publish contract for the event transport.
///
/// At-least-once: a published envelope may reach a consumer more than once,
/// and consumers must tolerate duplicates. Publishing reports transport
/// acceptance only, never downstream processing.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publishes an envelope, routed by its `event_type` attribute.
    async fn publish(&self, envelope: Envelope) -> Result<MessageId>;
}

struct Subscriber {
    event_types: Vec<EventType>,
    tx: mpsc::Sender<Envelope>,
}

#[derive(Default)]
struct BusState {
    published: Vec<(MessageId, Envelope)>,
    subscribers: Vec<Subscriber>,
    dead_letters: Vec<Envelope>,
    fail_on_publish: bool,
}

/// In-memory event transport.
///
/// Routes envelopes to subscribers filtered by event type, retries each
/// delivery a fixed number of times, then parks the envelope on a
/// dead-letter queue. Every accepted envelope is kept for inspection.
#[derive(Clone, Default)]
pub struct InMemoryEventBus {
    state: Arc<RwLock<BusState>>,
}

impl InMemoryEventBus {
    /// Creates a new bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to the given event types, returning the delivery channel.
    pub fn subscribe(&self, event_types: &[EventType]) -> mpsc::Receiver<Envelope> {
        let (tx, rx) = mpsc::channel(64);
        self.state.write().unwrap().subscribers.push(Subscriber {
            event_types: event_types.to_vec(),
            tx,
        });
        rx
    }

    /// Configures the bus to refuse the next publishes.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.state.write().unwrap().fail_on_publish = fail;
    }

    /// Returns every envelope accepted so far.
    pub fn published(&self) -> Vec<Envelope> {
        self.state
            .read()
            .unwrap()
            .published
            .iter()
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Returns how many envelopes of one event type were accepted.
    pub fn published_count(&self, event_type: EventType) -> usize {
        self.state
            .read()
            .unwrap()
            .published
            .iter()
            .filter(|(_, e)| e.event_type == event_type)
            .count()
    }

    /// Returns the number of dead-lettered envelopes.
    pub fn dead_letter_count(&self) -> usize {
        self.state.read().unwrap().dead_letters.len()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, envelope: Envelope) -> Result<MessageId> {
        // Record and snapshot matching senders under the lock, deliver
        // outside it.
        let (message_id, senders) = {
            let mut state = self.state.write().unwrap();
            if state.fail_on_publish {
                return Err(EventError::Transport(
                    "transport refused the envelope".to_string(),
                ));
            }
            let message_id = MessageId::new();
            state.published.push((message_id, envelope.clone()));
            let senders: Vec<mpsc::Sender<Envelope>> = state
                .subscribers
                .iter()
                .filter(|s| s.event_types.contains(&envelope.event_type))
                .map(|s| s.tx.clone())
                .collect();
            (message_id, senders)
        };

        metrics::counter!("events_published_total").increment(1);

        for tx in senders {
            let mut delivered = false;
            for attempt in 1..=MAX_DELIVERY_ATTEMPTS {
                if tx.send(envelope.clone()).await.is_ok() {
                    delivered = true;
                    break;
                }
                tracing::warn!(
                    event_type = %envelope.event_type,
                    attempt,
                    "envelope delivery failed"
                );
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            if !delivered {
                self.state
                    .write()
                    .unwrap()
                    .dead_letters
                    .push(envelope.clone());
                metrics::counter!("events_dead_lettered_total").increment(1);
                tracing::error!(
                    event_type = %envelope.event_type,
                    "envelope dead-lettered after {MAX_DELIVERY_ATTEMPTS} attempts"
                );
            }
        }

        Ok(message_id)
    }
}
