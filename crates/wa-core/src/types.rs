//! Core data types: messages, sessions, and log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a message relative to the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// Delivery status of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Received,
    Failed,
}

/// A single inbound or outbound message
///
/// The id and direction are fixed at creation and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier
    pub id: String,
    /// Sender address (phone number, or SYSTEM/BOT markers)
    pub from: String,
    /// Recipient address
    pub to: String,
    /// Message text
    pub body: String,
    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub status: DeliveryStatus,
    /// Whether this message was authored by the bot pipeline
    pub is_bot: bool,
}

impl Message {
    /// Create an inbound message as received from a webhook
    pub fn inbound(from: impl Into<String>, to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: format!("msg_in_{}", uuid::Uuid::new_v4().simple()),
            from: from.into(),
            to: to.into(),
            body: body.into(),
            timestamp: Utc::now(),
            direction: Direction::Inbound,
            status: DeliveryStatus::Received,
            is_bot: false,
        }
    }

    /// Create an outbound bot-authored message
    pub fn outbound(from: impl Into<String>, to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: format!("msg_out_{}", uuid::Uuid::new_v4().simple()),
            from: from.into(),
            to: to.into(),
            body: body.into(),
            timestamp: Utc::now(),
            direction: Direction::Outbound,
            status: DeliveryStatus::Sent,
            is_bot: true,
        }
    }

    /// Replace the generated id with a provider-assigned one
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Override the delivery status
    pub fn with_status(mut self, status: DeliveryStatus) -> Self {
        self.status = status;
        self
    }
}

/// The conversation with one contact address
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Contact address, the primary key
    pub address: String,
    /// Display name
    pub name: String,
    /// Messages in arrival order, append-only
    pub messages: Vec<Message>,
    /// Last mutation timestamp, monotonically non-decreasing
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Create an empty session for a contact
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
            messages: Vec::new(),
            last_activity: Utc::now(),
        }
    }

    /// Append a message and bump the activity timestamp
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.last_activity = Utc::now();
    }

    /// Get message count
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Check if the session has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Log severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Success,
}

/// An observability record kept in the store's bounded log buffer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Optional structured payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogEntry {
    /// Create a log entry with a fresh id
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level,
            message: message.into(),
            details: None,
        }
    }

    /// Attach a structured payload
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
