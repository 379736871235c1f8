//! Route definitions
//!
//! Defines all HTTP API endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{
    add_bot_command, delete_session, get_session, health, list_bot_commands, list_logs,
    list_sessions, send_message, update_bot_command, webhook,
};
use crate::server::AppState;

/// Create the API router
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health))
        // WhatsApp pipeline
        .route("/api/whatsapp/webhook", post(webhook))
        .route("/api/whatsapp/send", post(send_message))
        // Session management
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/{address}", get(get_session))
        .route("/api/sessions/{address}", delete(delete_session))
        // Activity log
        .route("/api/logs", get(list_logs))
        // Bot command administration
        .route("/api/bot/commands", get(list_bot_commands))
        .route("/api/bot/commands", post(add_bot_command))
        .route("/api/bot/commands/{key}", put(update_bot_command))
}
