//! Bot engine: command registration and inbound message matching

use regex::Regex;
use tracing::debug;

use wa_core::Message;

use crate::calc;
use crate::command::{normalize_key, BotCommand, CommandContext, CommandResponse};

/// Reply sent when a slash-prefixed message matches no command
pub const UNKNOWN_COMMAND_REPLY: &str = "❓ Unknown command. Type *menu* for list.";

/// Reply sent when a plain message contains a greeting word
pub const GREETING_REPLY: &str =
    "👋 Hello! I am the Gateway Bot. Type *menu* or */menu* to start.";

/// Reply sent when /calc cannot evaluate its arguments
pub const INVALID_EXPRESSION_REPLY: &str = "❌ Invalid expression. Try: calc 10*5";

/// Owns the command table and resolves inbound messages to replies
pub struct BotEngine {
    commands: Vec<BotCommand>,
    greeting: Regex,
}

impl BotEngine {
    /// Create an engine with the built-in commands pre-registered
    pub fn new() -> Self {
        let commands = vec![
            BotCommand::new(
                "/menu",
                "Show available commands",
                CommandResponse::Dynamic(menu_response),
            ),
            BotCommand::new(
                "/help",
                "Get help using the bot",
                CommandResponse::Static(
                    "🆘 *Support*\n\nIf you need assistance, please contact \
                     admin@example.com or type *menu* to see what I can do."
                        .to_string(),
                ),
            ),
            BotCommand::new(
                "/ping",
                "Check server latency",
                CommandResponse::Dynamic(ping_response),
            ),
            BotCommand::new(
                "/id",
                "Get your User ID",
                CommandResponse::Dynamic(id_response),
            ),
            BotCommand::new(
                "/calc",
                "Calculate simple math (e.g. calc 5+5)",
                CommandResponse::Dynamic(calc_response),
            ),
        ];

        Self {
            commands,
            greeting: Regex::new(r"\b(hi|hello|halo|hola|pagi|siang|malam)\b")
                .expect("greeting pattern is valid"),
        }
    }

    /// The command table in registration order
    pub fn commands(&self) -> &[BotCommand] {
        &self.commands
    }

    /// Register a command with a static response, replacing any existing
    /// entry with the same normalized key in place. Returns the key.
    pub fn add_command(&mut self, command: &str, description: &str, response_text: &str) -> String {
        let key = normalize_key(command);

        let entry = BotCommand::new(
            key.clone(),
            description,
            CommandResponse::Static(response_text.to_string()),
        );

        if let Some(existing) = self.commands.iter_mut().find(|c| c.key == key) {
            *existing = entry;
        } else {
            self.commands.push(entry);
        }

        debug!("Registered command: {}", key);
        key
    }

    /// Replace only the response of an existing command, keeping its
    /// description. Returns whether the key existed.
    pub fn update_command_response(&mut self, command_key: &str, response_text: &str) -> bool {
        let key = normalize_key(command_key);
        match self.commands.iter_mut().find(|c| c.key == key) {
            Some(cmd) => {
                cmd.response = CommandResponse::Static(response_text.to_string());
                true
            }
            None => false,
        }
    }

    /// Resolve an inbound message to a reply, or None for silence.
    pub fn process(&self, message: &Message) -> Option<String> {
        let body = message.body.trim();
        if body.is_empty() {
            return None;
        }

        let mut tokens = body.split_whitespace();
        let key = normalize_key(tokens.next()?);

        debug!("Processing command match: {}", key);

        if let Some(cmd) = self.commands.iter().find(|c| c.key == key) {
            let args: Vec<&str> = tokens.collect();
            let ctx = CommandContext {
                args: &args,
                sender: &message.from,
                commands: &self.commands,
            };
            return Some(cmd.response.render(&ctx));
        }

        // A slash-prefixed message that matched nothing is a failed command
        // attempt, not ordinary conversation.
        if body.starts_with('/') {
            return Some(UNKNOWN_COMMAND_REPLY.to_string());
        }

        // Greeting fallback for plain text
        if self.greeting.is_match(&body.to_lowercase()) {
            return Some(GREETING_REPLY.to_string());
        }

        None
    }
}

impl Default for BotEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn menu_response(ctx: &CommandContext) -> String {
    let listing = ctx
        .commands
        .iter()
        .map(|c| format!("🔹 *{}* - {}", c.key.trim_start_matches('/'), c.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!("🤖 *WhatsApp Bot Menu*\n\n{}\n\n_Powered by wa-gateway_", listing)
}

fn ping_response(_ctx: &CommandContext) -> String {
    format!(
        "🏓 *Pong!*\nServer time: {}\nStatus: ✅ Operational",
        chrono::Utc::now().format("%H:%M:%S")
    )
}

fn id_response(ctx: &CommandContext) -> String {
    format!("🆔 Your WhatsApp ID is: *{}*", ctx.sender)
}

fn calc_response(ctx: &CommandContext) -> String {
    let expression = ctx.args.concat();
    match calc::evaluate(&expression) {
        Ok(value) => format!("🔢 Result: *{}*", calc::format_result(value)),
        Err(_) => INVALID_EXPRESSION_REPLY.to_string(),
    }
}
