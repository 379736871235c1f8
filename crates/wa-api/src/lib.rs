//! wa-api: HTTP surface for wa-gateway
//!
//! REST endpoints over the router, session store, and bot engine.
//! Built with axum for async HTTP handling.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::{ApiError, Result};
pub use server::{start_server, AppState};
