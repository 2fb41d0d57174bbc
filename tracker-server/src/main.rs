use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tracker_server::cache::{CacheConfig, CachedClient};
use tracker_server::engine::{EngineConfig, Tracker};
use tracker_server::olhovivo::{OlhoVivoClient, OlhoVivoConfig};
use tracker_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tracker_server=info")),
        )
        .init();

    // Get the API token from the environment
    let token = std::env::var("OLHO_VIVO_TOKEN").unwrap_or_else(|_| {
        warn!("OLHO_VIVO_TOKEN not set; upstream authentication will fail");
        String::new()
    });

    // Create the Olho Vivo client behind the line resolution cache
    let client =
        OlhoVivoClient::new(OlhoVivoConfig::new(&token)).expect("Failed to create API client");
    let api = Arc::new(CachedClient::new(client, &CacheConfig::default()));

    // Create the polling tracker
    let tracker = Tracker::new(api.clone(), EngineConfig::default());

    // Build app state and router
    let state = AppState::new(api, tracker);
    let app = create_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("Fleet tracker listening on http://{addr}");
    info!("  GET    /health            - Health check");
    info!("  GET    /api/lines/search  - Search lines by public code");
    info!("  GET    /api/arrivals      - Arrival predictions for a line");
    info!("  PUT    /api/watch         - Replace the tracked term list");
    info!("  DELETE /api/watch         - Stop tracking");
    info!("  GET    /api/snapshot      - Latest published snapshot");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
