//! HTTP API Server
//!
//! Starts and manages the axum-based HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router as AxumRouter;
use tower_http::cors::CorsLayer;
use tracing::info;

use wa_core::SessionStore;
use wa_router::Router;

use crate::routes::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub router: Arc<Router>,
}

impl AppState {
    pub fn new(store: Arc<SessionStore>, router: Arc<Router>) -> Self {
        Self { store, router }
    }
}

/// Start the HTTP API server
pub async fn start_server(port: u16, state: AppState) -> anyhow::Result<()> {
    let app: AxumRouter = routes()
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("HTTP API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
