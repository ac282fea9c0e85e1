//! Event envelope protocol and delivery path for the storefront pipeline.
//!
//! This crate provides:
//! - The `Envelope` wire format and the typed domain event payloads
//! - The `EventBus` publish contract with an in-memory transport
//! - The `AuditBus` fallback path for rejected mutations
//! - The `EventRecorder` that appends TTL-bounded log entries

pub mod audit;
pub mod bus;
pub mod envelope;
pub mod error;
pub mod recorder;

pub use audit::{AuditBus, AuditRecord, InMemoryAuditBus};
pub use bus::{EventBus, InMemoryEventBus};
pub use envelope::{DomainEvent, Envelope, EventType, OrderEvent, ProductEvent};
pub use error::{EventError, Result};
pub use recorder::{EventLogEntry, EventRecorder, ProductEventInfo};
