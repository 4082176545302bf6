mod agent;
mod catalog;
mod categorizer;
mod config;
mod model;
mod server;

use agent::GeminiAgent;
use catalog::CatalogStore;
use config::load_config;
use server::AppState;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {}", panic_info);
    }));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.json".to_string());
    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // The catalog must be in place before any chat traffic is accepted.
    let store = Arc::new(CatalogStore::new());
    match store.initialize_catalog(&config.data_path) {
        Ok(catalog) if catalog.is_empty() => {
            warn!("Catalog {} contains no products", config.data_path.display())
        }
        Ok(_) => {}
        Err(e) => {
            error!("Failed to initialize catalog: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let agent = match GeminiAgent::new(config.agent.clone(), store.clone()) {
        Ok(agent) => Arc::new(agent),
        Err(e) => {
            error!("Failed to create agent: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Agent ready (model {})", config.agent.model);

    let state = AppState {
        store,
        agent,
        data_path: config.data_path.clone(),
    };
    let app = server::router(state, &config.allowed_origins);

    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Listening on {}", addr);
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("HTTP server failed: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Server shutdown complete.");
    ExitCode::SUCCESS
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down...");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, shutting down...");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
