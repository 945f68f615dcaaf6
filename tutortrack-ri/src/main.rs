//! tutortrack-ri - Recording Ingest service
//!
//! Resolves tutoring-session recordings from cloud API polling, webhook
//! payloads, and mirrored file-store trees to a canonical identity:
//! which student, which coach, which program week. Serves HTTP REST +
//! SSE on port 5741.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use tutortrack_common::events::EventBus;

use tutortrack_ri::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting tutortrack-ri (Recording Ingest) service");
    info!("Port: 5741");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve the root folder: ENV, then TOML, then the OS default
    let root_folder = tutortrack_common::config::resolve_root_folder("TUTORTRACK_ROOT")
        .map_err(|e| anyhow::anyhow!("Failed to resolve root folder: {}", e))?;
    info!("Root folder: {}", root_folder.display());

    // Open or create the service database
    let db_path = root_folder.join("tutortrack.db");
    info!("Database: {}", db_path.display());
    let db_pool = tutortrack_ri::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Event bus for SSE broadcasting
    let event_bus = EventBus::new(100); // 100 event capacity
    info!("Event bus initialized");

    let state = AppState::new(db_pool, event_bus);
    let app = tutortrack_ri::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:5741").await?;
    info!("Listening on http://127.0.0.1:5741");
    info!("Health check: http://127.0.0.1:5741/health");

    axum::serve(listener, app).await?;

    Ok(())
}
