//! Bot command table entries

/// Everything a response handler may inspect: the argument tokens that
/// followed the command, the sender's address, and a read-only view of the
/// full command table (for commands that list other commands).
pub struct CommandContext<'a> {
    pub args: &'a [&'a str],
    pub sender: &'a str,
    pub commands: &'a [BotCommand],
}

/// Handler signature for dynamic responses
pub type DynamicHandler = fn(&CommandContext) -> String;

/// How a command produces its reply text.
///
/// Static responses are plain data so admin tooling can read and edit the
/// current text without invoking code; dynamic responses compute their text
/// from the context.
#[derive(Clone)]
pub enum CommandResponse {
    Static(String),
    Dynamic(DynamicHandler),
}

impl CommandResponse {
    /// Produce the reply text for the given context
    pub fn render(&self, ctx: &CommandContext) -> String {
        match self {
            CommandResponse::Static(text) => text.clone(),
            CommandResponse::Dynamic(handler) => handler(ctx),
        }
    }

    /// The current text of a static response, if this is one
    pub fn static_text(&self) -> Option<&str> {
        match self {
            CommandResponse::Static(text) => Some(text),
            CommandResponse::Dynamic(_) => None,
        }
    }
}

impl std::fmt::Debug for CommandResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandResponse::Static(text) => f.debug_tuple("Static").field(text).finish(),
            CommandResponse::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// A registered trigger/response pair
#[derive(Debug, Clone)]
pub struct BotCommand {
    /// Normalized key: leading slash, lowercase, unique across the table
    pub key: String,
    /// Human-readable description shown in the menu
    pub description: String,
    pub response: CommandResponse,
}

impl BotCommand {
    pub fn new(
        key: impl Into<String>,
        description: impl Into<String>,
        response: CommandResponse,
    ) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            response,
        }
    }
}

/// Normalize a raw command token: trim, lowercase, ensure a leading slash
pub fn normalize_key(raw: &str) -> String {
    let trimmed = raw.trim().to_lowercase();
    if trimmed.starts_with('/') {
        trimmed
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("menu"), "/menu");
        assert_eq!(normalize_key("/Menu"), "/menu");
        assert_eq!(normalize_key("  PING  "), "/ping");
    }

    #[test]
    fn test_static_text_readable_without_invocation() {
        let response = CommandResponse::Static("hello".to_string());
        assert_eq!(response.static_text(), Some("hello"));

        let dynamic = CommandResponse::Dynamic(|_| "computed".to_string());
        assert_eq!(dynamic.static_text(), None);
    }
}
