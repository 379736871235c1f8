//! In-memory session store
//!
//! Authoritative holder of all conversation state and the activity log.
//! Thread-safe via DashMap; every mutation publishes a [`StoreEvent`] so
//! outer layers (dashboards, tests) can react to changes.

mod event;
mod log;

pub use event::StoreEvent;
pub use log::{LogBuffer, LOG_CAPACITY};

use std::sync::Mutex;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::types::{LogEntry, Message, Session};

/// Broadcast channel capacity for store events
const EVENT_CAPACITY: usize = 256;

/// In-memory store for sessions and the activity log
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    logs: Mutex<LogBuffer>,
    events: broadcast::Sender<StoreEvent>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            sessions: DashMap::new(),
            logs: Mutex::new(LogBuffer::default()),
            events,
        }
    }

    /// Create a session for a contact.
    ///
    /// Idempotent: an existing session is left untouched and no event is
    /// published. Returns whether a session was actually created.
    pub fn create_session(&self, address: &str, name: &str) -> bool {
        match self.sessions.entry(address.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Session::new(address, name));
                debug!("Created session for {}", address);
                self.publish(StoreEvent::SessionCreated {
                    address: address.to_string(),
                });
                true
            }
        }
    }

    /// Delete a session. No-op when absent.
    pub fn delete_session(&self, address: &str) -> bool {
        if self.sessions.remove(address).is_some() {
            self.publish(StoreEvent::SessionDeleted {
                address: address.to_string(),
            });
            true
        } else {
            false
        }
    }

    /// Get a snapshot of one session
    pub fn get_session(&self, address: &str) -> Option<Session> {
        self.sessions.get(address).map(|s| s.clone())
    }

    /// All sessions ordered by descending last activity
    pub fn all_sessions(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.sessions.iter().map(|s| s.clone()).collect();
        sessions.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        sessions
    }

    /// Append a message to a session.
    ///
    /// Returns false without mutating anything if the session does not
    /// exist; callers are responsible for creating the session first.
    pub fn add_message(&self, address: &str, message: Message) -> bool {
        let Some(mut session) = self.sessions.get_mut(address) else {
            warn!("Dropping message for unknown session {}", address);
            return false;
        };

        let message_id = message.id.clone();
        session.add_message(message);
        drop(session);

        self.publish(StoreEvent::MessageAdded {
            address: address.to_string(),
            message_id,
        });
        true
    }

    /// Prepend a log entry, evicting the oldest past capacity
    pub fn add_log(&self, entry: LogEntry) {
        let entry_id = entry.id.clone();
        self.logs.lock().unwrap().push(entry);
        self.publish(StoreEvent::LogAdded { entry_id });
    }

    /// Snapshot of the log buffer, newest first
    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs.lock().unwrap().snapshot()
    }

    /// Subscribe to store mutations.
    ///
    /// The receiver observes one event per mutation performed after this
    /// call. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Seed the demo session used by the dashboard walkthrough
    pub fn seed_demo_session(&self) {
        self.create_session("628123456789", "Demo User");
    }

    fn publish(&self, event: StoreEvent) {
        // No subscribers is fine; the event is dropped.
        let _ = self.events.send(event);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeliveryStatus, LogLevel};

    #[test]
    fn test_create_session_idempotent() {
        let store = SessionStore::new();
        assert!(store.create_session("628123", "Alice"));

        store.add_message("628123", Message::inbound("628123", "SYSTEM", "hi"));
        assert!(!store.create_session("628123", "Alice again"));

        // The original session (and its messages) survive the second call
        let session = store.get_session("628123").unwrap();
        assert_eq!(session.name, "Alice");
        assert_eq!(session.message_count(), 1);
    }

    #[test]
    fn test_delete_session_absent_is_noop() {
        let store = SessionStore::new();
        assert!(!store.delete_session("nobody"));
    }

    #[test]
    fn test_add_message_unknown_session_drops() {
        let store = SessionStore::new();
        let added = store.add_message("ghost", Message::inbound("ghost", "SYSTEM", "boo"));
        assert!(!added);
        assert!(store.get_session("ghost").is_none());
    }

    #[test]
    fn test_all_sessions_ordered_by_activity() {
        let store = SessionStore::new();
        store.create_session("111", "First");
        store.create_session("222", "Second");

        // Touch the first session so it becomes the most recent
        store.add_message("111", Message::inbound("111", "SYSTEM", "ping"));

        let sessions = store.all_sessions();
        assert_eq!(sessions[0].address, "111");
        assert_eq!(sessions[1].address, "222");
    }

    #[test]
    fn test_log_buffer_bounded() {
        let store = SessionStore::new();
        for i in 0..120 {
            store.add_log(LogEntry::new(LogLevel::Info, format!("log {}", i)));
        }

        let logs = store.logs();
        assert_eq!(logs.len(), LOG_CAPACITY);
        assert_eq!(logs[0].message, "log 119");
    }

    #[tokio::test]
    async fn test_subscribe_receives_mutations() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.create_session("628123", "Alice");
        store.add_message("628123", Message::inbound("628123", "SYSTEM", "hi"));
        store.delete_session("628123");

        assert!(matches!(
            rx.recv().await.unwrap(),
            StoreEvent::SessionCreated { .. }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            StoreEvent::MessageAdded { .. }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            StoreEvent::SessionDeleted { .. }
        ));
    }

    #[test]
    fn test_publish_without_subscribers_does_not_panic() {
        let store = SessionStore::new();
        store.create_session("628123", "Alice");
        store.add_log(LogEntry::new(LogLevel::Success, "sent"));
    }

    #[test]
    fn test_message_status_preserved() {
        let store = SessionStore::new();
        store.create_session("628123", "Alice");
        store.add_message(
            "628123",
            Message::outbound("BOT", "628123", "reply").with_status(DeliveryStatus::Failed),
        );

        let session = store.get_session("628123").unwrap();
        assert_eq!(session.messages[0].status, DeliveryStatus::Failed);
    }
}
