use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use designtaste::config::default_config_path;
use designtaste::{init_logging, load_config_or_default, Config, DesignTasteError};
use designtaste_server::{build_router, AppState};
use log::{error, info};

const CONFIG_ENV: &str = "DESIGNTASTE_CONFIG";

/// `DESIGNTASTE_CONFIG`, else `~/.designtaste/config.json`.
fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .or_else(default_config_path)
        .unwrap_or_else(|| PathBuf::from("designtaste.json"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = config.server.socket_addr().ok_or_else(|| {
        DesignTasteError::Config(designtaste::ConfigError::Validation {
            message: format!("Invalid bind address: {}", config.server.bind),
        })
    })?;

    let state = Arc::new(AppState::from_config(&config)?);
    let app = build_router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.shutdown().await;
    info!("Server stopped");
    Ok(())
}

#[tokio::main]
async fn main() {
    let config = match load_config_or_default(&config_path()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.log) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting DesignTaste server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
