//! Simulated delivery provider
//!
//! Sleeps for a configurable delay to model network latency, then reports
//! success with a synthesized message id. Used by the demo deployment and
//! by tests.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::{DeliveryProvider, SendOutcome};

/// In-process provider that always succeeds
#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    delay: Duration,
}

impl SimulatedProvider {
    /// Create a provider with the given artificial latency
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Provider with no artificial latency, for tests
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new(Duration::from_millis(800))
    }
}

#[async_trait]
impl DeliveryProvider for SimulatedProvider {
    async fn send_message(&self, to: &str, body: &str) -> SendOutcome {
        info!("Preparing simulated send to {}", to);

        tokio::time::sleep(self.delay).await;

        let id = format!("msg_{}", uuid::Uuid::new_v4().simple());
        info!("Simulated send to {} succeeded ({} chars, id {})", to, body.len(), id);

        SendOutcome::ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_succeeds() {
        let provider = SimulatedProvider::instant();
        let outcome = provider.send_message("628123", "hello").await;
        assert!(outcome.success);
        assert!(outcome.id.starts_with("msg_"));
        assert!(outcome.raw.is_none());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let provider = SimulatedProvider::instant();
        let a = provider.send_message("628123", "one").await;
        let b = provider.send_message("628123", "two").await;
        assert_ne!(a.id, b.id);
    }
}
