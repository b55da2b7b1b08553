use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use floodwatch_core::config::ProviderSettings;
use floodwatch_engine::{MappingService, RasterBackend, RemoteRasterBackend};
use floodwatch_imagery::SentinelHub;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use floodwatch_api::config::ApiConfig;
use floodwatch_api::routes::create_router;
use floodwatch_api::state::AppState;
use floodwatch_api::store::MemoryReportStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "floodwatch_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();

    let settings = match ProviderSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load provider configuration: {}", e);
            tracing::error!(
                "Remediation:\n\
                1. Set FLOODWATCH_CLIENT_ID and FLOODWATCH_CLIENT_SECRET\n\
                2. Or point FLOODWATCH_CONFIG at a TOML file carrying them"
            );
            std::process::exit(1);
        }
    };

    tracing::info!(
        port = config.port,
        client_id = %settings.client_id,
        "Starting Floodwatch API server"
    );

    let imagery = match SentinelHub::new(&settings) {
        Ok(hub) => Arc::new(hub),
        Err(e) => {
            tracing::error!("Failed to build imagery client: {}", e);
            std::process::exit(1);
        }
    };

    let backend: Arc<dyn RasterBackend> = match RemoteRasterBackend::new(&settings) {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            tracing::error!("Failed to build raster backend: {}", e);
            std::process::exit(1);
        }
    };

    // Warm up the provider handshake so the first overlay request does not
    // pay for it; failures are logged and retried on first use.
    {
        let backend = backend.clone();
        tokio::spawn(async move {
            if let Err(e) = backend.ensure_ready().await {
                tracing::error!("Raster backend initialization failed: {}", e);
            }
        });
    }

    let mapping = Arc::new(MappingService::new(imagery.clone(), backend));

    let state = Arc::new(AppState::new(
        imagery,
        mapping,
        Arc::new(MemoryReportStore::new()),
        config.image_dir.clone(),
    ));

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app).await.unwrap();
}
