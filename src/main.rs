//! Overtimer - a state-managed timer service for always-on-top countdown
//! widgets
//!
//! This is the main entry point for the overtimer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use overtimer::{
    api::create_router,
    config::Config,
    state::AppState,
    storage::FileStorage,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("overtimer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting overtimer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, data_dir={}, default={}s",
        config.host,
        config.port,
        config.data_dir.display(),
        config.default_seconds
    );

    // Open persisted storage and restore all registered windows
    let storage = Arc::new(FileStorage::open(&config.data_dir));
    let state = Arc::new(AppState::new(storage, config.default_seconds));
    if let Err(e) = state.restore_windows() {
        tracing::error!("Failed to restore windows: {}", e);
        std::process::exit(1);
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /windows                  - List windows and registry");
    info!("  POST   /windows                  - Open a new timer window");
    info!("  DELETE /windows/:id              - Close a window");
    info!("  POST   /windows/:id/toggle       - Play/pause");
    info!("  PUT    /windows/:id/time         - Set a duration");
    info!("  POST   /windows/:id/edit/:seg    - Edit a time segment");
    info!("  GET    /status                   - Server status");
    info!("  GET    /health                   - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
