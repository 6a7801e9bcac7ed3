use bus_board::board::BoardService;
use bus_board::cache::FreshnessCache;
use bus_board::config::{AppConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, Secrets};
use bus_board::logging::init_logging;
use bus_board::mbta::MbtaClient;
use bus_board::web::{AppState, create_router};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    init_logging().expect("Failed to initialise logging");

    let secrets = Secrets::from_env();
    if secrets.mbta_api_key.is_none() {
        warn!("MBTA_API_KEY not set; requests use the anonymous rate limit");
    }
    if secrets.api_key.is_none() {
        warn!("API_KEY not set; /v1 endpoints are unauthenticated");
    }

    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::load(&config_path, secrets).expect("Failed to load config");
    info!(
        path = %config_path,
        stops = config.stops.len(),
        cache_ttl = config.cache_ttl,
        stale_max_age = config.stale_max_age,
        "loaded config"
    );

    let client = MbtaClient::new(config.mbta_config()).expect("Failed to create MBTA client");
    let cache = FreshnessCache::new(&config.cache_config());
    let service = BoardService::new(config.stops.clone(), client, cache);

    let state = AppState::new(service, config.secrets.api_key.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    info!(addr = %config.bind_addr, "bus board listening");
    info!("  GET  /health             - Health check");
    info!("  GET  /v1/board           - All stops");
    info!("  GET  /v1/board/{{key}}     - One stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolve on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
