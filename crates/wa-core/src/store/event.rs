//! Change-notification events emitted by the session store
//!
//! Built on `tokio::sync::broadcast`: every mutating store operation sends
//! exactly one event to all subscribers registered at that moment. Sending
//! with no active subscribers is a no-op. A subscriber that falls behind the
//! channel capacity observes `RecvError::Lagged` rather than blocking the
//! store.

use serde::Serialize;

/// One event per mutating store operation
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    SessionCreated { address: String },
    SessionDeleted { address: String },
    MessageAdded { address: String, message_id: String },
    LogAdded { entry_id: String },
}
