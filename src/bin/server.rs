//! Reminder HTTP Server Binary
//!
//! This is the main entry point for the reminder REST API server.
//! It initializes the file-backed stores, re-arms timers for records that
//! survived the last shutdown, starts the periodic cleanup loop, and serves
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin reminders-server --features http-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REMINDERS_DATA_DIR`: Storage directory (overrides reminders.toml)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use trip_reminders::delivery::ConsoleBackend;
use trip_reminders::http::{create_router, AppState};
use trip_reminders::services::{ReminderConfig, ReminderService};
use trip_reminders::store::FileStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting reminder server");

    // Load configuration, with the data dir overridable from the environment
    let mut config = ReminderConfig::from_default_location();
    if let Ok(dir) = env::var("REMINDERS_DATA_DIR") {
        config.data_dir = dir.into();
    }

    let store = Arc::new(FileStore::open(&config.data_dir)?);
    info!("Storage initialized at {}", config.data_dir.display());

    let service = ReminderService::with_config(store, Arc::new(ConsoleBackend::new()), &config);

    // Timers do not survive a restart; re-arm them from the persisted registry
    let rearmed = service.rearm_pending();
    info!("Re-armed {rearmed} pending reminders");

    Arc::clone(&service).spawn_cleanup_loop(config.cleanup_interval());

    // Create application state and router
    let state = AppState::new(service);
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
