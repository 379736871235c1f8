//! wa-bot: command matching engine for wa-gateway
//!
//! Owns the table of recognized commands, matches inbound message text
//! against it, and produces a reply body or decides silence is warranted.
//! Matching is a pure function of a single message; there is no
//! cross-message state.

pub mod calc;
pub mod command;
pub mod engine;

pub use command::{BotCommand, CommandContext, CommandResponse};
pub use engine::BotEngine;
