//! wa-router: the inbound→bot→outbound pipeline
//!
//! Receives webhook payloads, persists them, invokes the bot engine after a
//! simulated thinking delay, and delivers any reply through the configured
//! provider after a simulated typing delay. Also carries the
//! administrator-initiated send path that bypasses the bot.
//!
//! Each inbound message gets its own independently delayed reply task, so
//! two rapid messages to one session can have their replies reorder
//! relative to each other. That matches the upstream gateway behavior and
//! is an accepted non-guarantee, not a bug.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use wa_bot::BotEngine;
use wa_core::{DeliveryStatus, LogEntry, LogLevel, Message, SessionStore};
use wa_provider::{DeliveryProvider, SendOutcome};

/// Sender marker for administrator-initiated messages
pub const SYSTEM_SENDER: &str = "SYSTEM";

/// Sender marker for bot replies
pub const BOT_SENDER: &str = "BOT";

/// Inbound webhook payload shape
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub from: String,
    pub body: String,
}

/// Webhook acknowledgment, returned before bot processing completes
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub success: bool,
}

/// Reply timing knobs; zeroed in tests
#[derive(Debug, Clone, Copy)]
pub struct ReplyDelays {
    /// Pause before the bot engine is invoked
    pub thinking: Duration,
    /// Pause before a matched reply is handed to the provider
    pub typing: Duration,
}

impl ReplyDelays {
    pub fn new(thinking: Duration, typing: Duration) -> Self {
        Self { thinking, typing }
    }

    /// No delays, for tests
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

impl Default for ReplyDelays {
    fn default() -> Self {
        Self::new(Duration::from_millis(600), Duration::from_millis(800))
    }
}

/// Orchestrates the store, the bot engine, and the delivery provider
pub struct Router {
    store: Arc<SessionStore>,
    provider: Arc<dyn DeliveryProvider>,
    bot: Arc<RwLock<BotEngine>>,
    delays: ReplyDelays,
}

impl Router {
    pub fn new(
        store: Arc<SessionStore>,
        provider: Arc<dyn DeliveryProvider>,
        delays: ReplyDelays,
    ) -> Self {
        Self {
            store,
            provider,
            bot: Arc::new(RwLock::new(BotEngine::new())),
            delays,
        }
    }

    /// Shared handle to the bot engine, for the admin command surface
    pub fn bot(&self) -> Arc<RwLock<BotEngine>> {
        Arc::clone(&self.bot)
    }

    /// Accept an inbound message.
    ///
    /// The message is persisted synchronously (creating its session when
    /// unseen); bot matching and the possible reply happen on a spawned
    /// task after the caller already has its acknowledgment.
    pub fn handle_incoming_webhook(&self, payload: WebhookPayload) -> WebhookAck {
        let incoming = Message::inbound(&payload.from, SYSTEM_SENDER, &payload.body);

        // The store drops appends to unknown sessions, so the session must
        // exist before the append. The contact address doubles as the
        // display name until an admin renames it.
        self.store.create_session(&payload.from, &payload.from);
        self.store.add_message(&payload.from, incoming.clone());

        info!("Received message from {}", incoming.from);
        self.store.add_log(
            LogEntry::new(LogLevel::Info, format!("Received message from {}", incoming.from))
                .with_details(json!({ "body": incoming.body })),
        );

        let store = Arc::clone(&self.store);
        let provider = Arc::clone(&self.provider);
        let bot = Arc::clone(&self.bot);
        let delays = self.delays;
        tokio::spawn(async move {
            tokio::time::sleep(delays.thinking).await;

            let reply = bot.read().unwrap().process(&incoming);

            if let Some(reply) = reply {
                info!("Bot triggered. Replying to {}", incoming.from);
                store.add_log(LogEntry::new(
                    LogLevel::Info,
                    format!("Bot matched message from {}", incoming.from),
                ));
                send_reply(&store, provider.as_ref(), delays.typing, &incoming.from, &reply).await;
            }
        });

        WebhookAck { success: true }
    }

    /// Administrator-initiated send, bypassing the bot engine.
    ///
    /// Returns the provider outcome unchanged. On success the target
    /// session is created when absent and the message persisted as sent.
    pub async fn send_outbound_message(&self, to: &str, body: &str) -> SendOutcome {
        let outcome = self.provider.send_message(to, body).await;

        if outcome.success {
            let message = Message::outbound(SYSTEM_SENDER, to, body).with_id(&outcome.id);
            self.store.create_session(to, "Unknown User");
            self.store.add_message(to, message);
            self.store.add_log(
                LogEntry::new(LogLevel::Success, format!("Outbound message sent to {}", to))
                    .with_details(json!({ "id": outcome.id })),
            );
        } else {
            self.store.add_log(
                LogEntry::new(LogLevel::Error, format!("Outbound send to {} failed", to))
                    .with_details(outcome.raw.clone().unwrap_or_default()),
            );
        }

        outcome
    }

}

/// Deliver a bot reply after the typing delay and persist the result.
///
/// A failed delivery is persisted with status `failed` so it stays visible
/// in the session history.
async fn send_reply(
    store: &SessionStore,
    provider: &dyn DeliveryProvider,
    typing_delay: Duration,
    to: &str,
    body: &str,
) {
    tokio::time::sleep(typing_delay).await;

    let outcome = provider.send_message(to, body).await;

    let mut reply = Message::outbound(BOT_SENDER, to, body);
    if outcome.success {
        reply = reply.with_id(&outcome.id);
        store.add_log(
            LogEntry::new(LogLevel::Success, format!("Bot reply delivered to {}", to))
                .with_details(json!({ "id": outcome.id })),
        );
    } else {
        warn!("Provider failed to deliver bot reply to {}", to);
        reply = reply.with_status(DeliveryStatus::Failed);
        store.add_log(
            LogEntry::new(LogLevel::Error, format!("Bot reply to {} failed", to))
                .with_details(outcome.raw.clone().unwrap_or_default()),
        );
    }

    // The append no-ops (loudly) if the session was deleted while the
    // reply was in flight.
    store.add_message(to, reply);
}

#[cfg(test)]
mod tests {
    use super::*;
    use wa_core::Direction;
    use wa_provider::SimulatedProvider;

    fn test_router() -> Arc<Router> {
        Arc::new(Router::new(
            Arc::new(SessionStore::new()),
            Arc::new(SimulatedProvider::instant()),
            ReplyDelays::instant(),
        ))
    }

    fn router_with_store(store: Arc<SessionStore>) -> Arc<Router> {
        Arc::new(Router::new(
            store,
            Arc::new(SimulatedProvider::instant()),
            ReplyDelays::instant(),
        ))
    }

    /// Provider that always reports failure, for the failed-reply path
    struct FailingProvider;

    #[async_trait::async_trait]
    impl DeliveryProvider for FailingProvider {
        async fn send_message(&self, _to: &str, _body: &str) -> SendOutcome {
            SendOutcome::failed(json!({ "error": "unreachable" }))
        }
    }

    async fn settle() {
        // Let the spawned reply task run; delays are zeroed in tests.
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_webhook_acknowledges_immediately() {
        let router = test_router();
        let ack = router.handle_incoming_webhook(WebhookPayload {
            from: "628123456789".to_string(),
            body: "anything".to_string(),
        });
        assert!(ack.success);
    }

    #[tokio::test]
    async fn test_menu_scenario_appends_inbound_then_reply() {
        let store = Arc::new(SessionStore::new());
        let router = router_with_store(Arc::clone(&store));

        router.handle_incoming_webhook(WebhookPayload {
            from: "628123456789".to_string(),
            body: "/menu".to_string(),
        });
        settle().await;

        let session = store.get_session("628123456789").unwrap();
        assert_eq!(session.message_count(), 2);

        let inbound = &session.messages[0];
        assert_eq!(inbound.direction, Direction::Inbound);
        assert_eq!(inbound.body, "/menu");
        assert!(!inbound.is_bot);

        let reply = &session.messages[1];
        assert_eq!(reply.direction, Direction::Outbound);
        assert_eq!(reply.from, BOT_SENDER);
        assert!(reply.is_bot);
        assert!(reply.body.contains("menu"));
        assert!(reply.body.contains("calc"));
    }

    #[tokio::test]
    async fn test_unmatched_message_gets_no_reply() {
        let store = Arc::new(SessionStore::new());
        let router = router_with_store(Arc::clone(&store));

        router.handle_incoming_webhook(WebhookPayload {
            from: "628123456789".to_string(),
            body: "completely ordinary text".to_string(),
        });
        settle().await;

        let session = store.get_session("628123456789").unwrap();
        assert_eq!(session.message_count(), 1);
    }

    #[tokio::test]
    async fn test_admin_send_creates_session_and_persists() {
        let store = Arc::new(SessionStore::new());
        let router = router_with_store(Arc::clone(&store));

        let outcome = router.send_outbound_message("6281999", "hi there").await;
        assert!(outcome.success);

        let session = store.get_session("6281999").unwrap();
        assert_eq!(session.name, "Unknown User");
        assert_eq!(session.message_count(), 1);

        let message = &session.messages[0];
        assert_eq!(message.status, DeliveryStatus::Sent);
        assert_eq!(message.from, SYSTEM_SENDER);
        assert_eq!(message.id, outcome.id);
        assert!(message.is_bot);
    }

    #[tokio::test]
    async fn test_admin_send_failure_persists_nothing() {
        let store = Arc::new(SessionStore::new());
        let router = Arc::new(Router::new(
            Arc::clone(&store),
            Arc::new(FailingProvider),
            ReplyDelays::instant(),
        ));

        let outcome = router.send_outbound_message("6281999", "hi").await;
        assert!(!outcome.success);
        assert!(store.get_session("6281999").is_none());
    }

    #[tokio::test]
    async fn test_failed_bot_reply_persisted_as_failed() {
        let store = Arc::new(SessionStore::new());
        let router = Arc::new(Router::new(
            Arc::clone(&store),
            Arc::new(FailingProvider),
            ReplyDelays::instant(),
        ));

        router.handle_incoming_webhook(WebhookPayload {
            from: "628123456789".to_string(),
            body: "/ping".to_string(),
        });
        settle().await;

        let session = store.get_session("628123456789").unwrap();
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.messages[1].status, DeliveryStatus::Failed);
    }

    #[tokio::test]
    async fn test_reply_after_session_deleted_is_dropped() {
        let store = Arc::new(SessionStore::new());
        let router = router_with_store(Arc::clone(&store));

        router.handle_incoming_webhook(WebhookPayload {
            from: "628123456789".to_string(),
            body: "/ping".to_string(),
        });
        store.delete_session("628123456789");
        settle().await;

        // The delayed reply found no session and recreated nothing.
        assert!(store.get_session("628123456789").is_none());
    }

    #[tokio::test]
    async fn test_admin_commands_visible_to_pipeline() {
        let store = Arc::new(SessionStore::new());
        let router = router_with_store(Arc::clone(&store));

        router
            .bot()
            .write()
            .unwrap()
            .add_command("promo", "Promotions", "20% off!");

        router.handle_incoming_webhook(WebhookPayload {
            from: "628123456789".to_string(),
            body: "promo".to_string(),
        });
        settle().await;

        let session = store.get_session("628123456789").unwrap();
        assert_eq!(session.messages[1].body, "20% off!");
    }
}
