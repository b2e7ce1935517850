//! Humble Heroes roster server.
//!
//! Serves the hero CRUD API and the live `WebSocket` feed from a single
//! in-memory roster. Nothing is persisted: every restart begins with an
//! empty roster and no connected viewers.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `humble-config.yaml` (or `HUMBLE_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the roster and shared application state
//! 4. Serve until Ctrl-C or SIGTERM, then shut down gracefully

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use humble_api::{AppState, ServerConfig};
use humble_roster::HumbleConfig;
use humble_roster::config::{LogFormat, LoggingConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::ServerAppError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "humble-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, logging, or the server fails.
#[tokio::main]
async fn main() -> Result<(), ServerAppError> {
    // 1. Load configuration.
    let (config, config_source) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        source = %config_source,
        host = %config.server.host,
        port = config.server.port,
        session_buffer = config.broadcast.session_buffer,
        "humble-server starting"
    );

    // 3. Create the roster.
    let state = Arc::new(AppState::new(&config.broadcast));

    // 4. Serve.
    let server_config = ServerConfig::from(&config.server);
    humble_api::start_server(&server_config, state, shutdown_signal()).await?;

    info!("humble-server shutdown complete");
    Ok(())
}

/// Load configuration from the YAML file if present, else defaults.
///
/// Environment overrides apply in both cases.
fn load_config() -> Result<(HumbleConfig, String), ServerAppError> {
    let path = std::env::var("HUMBLE_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        let config = HumbleConfig::from_file(&path)?;
        Ok((config, path.display().to_string()))
    } else {
        Ok((HumbleConfig::from_env()?, "defaults".to_owned()))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), ServerAppError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match logging.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| ServerAppError::Logging {
        message: format!("{e}"),
    })
}

/// Resolve when the process receives Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}
