//! wa-gateway: WhatsApp Gateway Simulator Main Binary
//!
//! Usage:
//!   wa-gateway           - Start the gateway server
//!   wa-gateway --help    - Show help

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use wa_api::{start_server, AppState};
use wa_core::{Config, ProviderKind, SessionStore};
use wa_provider::{DeliveryProvider, HttpProvider, SimulatedProvider};
use wa_router::{ReplyDelays, Router};

/// Run mode
enum RunMode {
    /// Server mode
    Server,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match parse_args() {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("wa-gateway {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Server => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting wa-gateway...");

    // Session store, seeded with the dashboard demo session
    let store = Arc::new(SessionStore::new());
    store.seed_demo_session();

    // Select the delivery provider backend
    let provider: Arc<dyn DeliveryProvider> = match config.provider.kind {
        ProviderKind::Simulated => {
            tracing::info!("Using simulated delivery provider");
            Arc::new(SimulatedProvider::new(Duration::from_millis(
                config.provider.send_delay_ms,
            )))
        }
        ProviderKind::Http => {
            let api_url = config
                .provider
                .api_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("provider.api_url is required"))?;
            let token = config
                .provider
                .token
                .clone()
                .ok_or_else(|| anyhow::anyhow!("provider.token is required"))?;
            tracing::info!("Using HTTP delivery provider at {}", api_url);
            Arc::new(HttpProvider::new(api_url, token))
        }
    };

    let delays = ReplyDelays::new(
        Duration::from_millis(config.bot.thinking_delay_ms),
        Duration::from_millis(config.bot.typing_delay_ms),
    );

    let router = Arc::new(Router::new(Arc::clone(&store), provider, delays));
    let state = AppState::new(store, router);

    start_server(config.server.port, state).await
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().collect();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Server
}

/// Print help message
fn print_help() {
    println!("wa-gateway - WhatsApp Gateway Simulator");
    println!();
    println!("Usage:");
    println!("  wa-gateway           Start the gateway server");
    println!("  wa-gateway --help    Show this help message");
    println!("  wa-gateway --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  WA_PORT              HTTP API port (default: 3001)");
    println!("  WA_PROVIDER          Delivery provider: simulated or http (default: simulated)");
    println!("  WA_PROVIDER_URL      Remote send endpoint (http provider)");
    println!("  WA_PROVIDER_TOKEN    Bearer token (http provider)");
    println!();
    println!("Configuration can also be placed in ./wa-gateway.toml;");
    println!("environment variables take precedence.");
}
