//! wa-provider: outbound delivery backends for wa-gateway
//!
//! A single capability (send this text to this address) behind a trait so
//! the router stays decoupled from the concrete transport. Implementations
//! never raise for ordinary failures; a failed delivery is reported through
//! [`SendOutcome::success`].

pub mod http;
pub mod simulated;

pub use http::HttpProvider;
pub use simulated::SimulatedProvider;

use async_trait::async_trait;
use serde::Serialize;

/// Result of one delivery attempt.
///
/// `raw` carries the backend's diagnostic payload (response body or error
/// text) and is only informational.
#[derive(Debug, Clone, Serialize)]
pub struct SendOutcome {
    pub success: bool,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl SendOutcome {
    /// Successful delivery with a backend-assigned message id
    pub fn ok(id: impl Into<String>) -> Self {
        Self {
            success: true,
            id: id.into(),
            raw: None,
        }
    }

    /// Failed delivery with a diagnostic payload
    pub fn failed(raw: serde_json::Value) -> Self {
        Self {
            success: false,
            id: String::new(),
            raw: Some(raw),
        }
    }

    /// Attach the backend's raw response
    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }
}

/// Capability abstraction for transmitting an outbound message.
///
/// Implementations must not panic or return errors for ordinary delivery
/// failures; those surface as `success = false`.
#[async_trait]
pub trait DeliveryProvider: Send + Sync {
    async fn send_message(&self, to: &str, body: &str) -> SendOutcome;
}
