//! HTTP API handlers
//!
//! Request handlers for the webhook, admin send, session, log, and bot
//! command endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use wa_core::{LogEntry, Session};
use wa_provider::SendOutcome;
use wa_router::{WebhookAck, WebhookPayload};

use crate::server::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Admin send request payload
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub to: String,
    pub body: String,
}

/// Bot command registration payload
#[derive(Debug, Deserialize)]
pub struct AddCommandRequest {
    pub command: String,
    pub description: String,
    pub response: String,
}

/// Bot command response-edit payload
#[derive(Debug, Deserialize)]
pub struct UpdateCommandRequest {
    pub response: String,
}

/// Read-only view of one bot command.
///
/// `response` carries the current static text; dynamic built-ins expose
/// `null` since their text is computed per message.
#[derive(Debug, Serialize)]
pub struct CommandView {
    pub command: String,
    pub description: String,
    pub response: Option<String>,
}

/// Generic API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handler functions
// ============================================================================

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Inbound webhook endpoint.
///
/// Always acknowledges success; bot matching and the eventual reply happen
/// after this response is already on the wire.
pub async fn webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> Json<WebhookAck> {
    debug!("Webhook from {}", payload.from);
    Json(state.router.handle_incoming_webhook(payload))
}

/// Administrator-initiated send, bypassing the bot
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Json<SendOutcome> {
    info!("Admin send to {}", req.to);
    Json(state.router.send_outbound_message(&req.to, &req.body).await)
}

/// All sessions, most recently active first
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<Session>> {
    Json(state.store.all_sessions())
}

/// One session by contact address
pub async fn get_session(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Session>, (StatusCode, Json<ErrorResponse>)> {
    state.store.get_session(&address).map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session not found: {}", address),
            }),
        )
    })
}

/// Delete a session; deleting an absent session is not an error
pub async fn delete_session(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> StatusCode {
    info!("Deleting session: {}", address);
    state.store.delete_session(&address);
    StatusCode::NO_CONTENT
}

/// Activity log, newest first
pub async fn list_logs(State(state): State<AppState>) -> Json<Vec<LogEntry>> {
    Json(state.store.logs())
}

/// The bot command table in registration order
pub async fn list_bot_commands(State(state): State<AppState>) -> Json<Vec<CommandView>> {
    let bot = state.router.bot();
    let bot = bot.read().unwrap();
    let views = bot
        .commands()
        .iter()
        .map(|c| CommandView {
            command: c.key.clone(),
            description: c.description.clone(),
            response: c.response.static_text().map(str::to_string),
        })
        .collect();
    Json(views)
}

/// Register (or replace) a command with a static response
pub async fn add_bot_command(
    State(state): State<AppState>,
    Json(req): Json<AddCommandRequest>,
) -> (StatusCode, Json<CommandView>) {
    let bot = state.router.bot();
    let key = bot
        .write()
        .unwrap()
        .add_command(&req.command, &req.description, &req.response);

    info!("Registered bot command {}", key);
    (
        StatusCode::CREATED,
        Json(CommandView {
            command: key,
            description: req.description,
            response: Some(req.response),
        }),
    )
}

/// Replace the response text of an existing command
pub async fn update_bot_command(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<UpdateCommandRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let bot = state.router.bot();
    let updated = bot.write().unwrap().update_command_response(&key, &req.response);

    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Unknown command: {}", key),
            }),
        ))
    }
}
