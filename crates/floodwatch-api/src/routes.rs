use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Flood overlays ("floopMapping" is what the deployed clients call)
        .route("/agency/floopMapping", post(handlers::flood_mapping))
        .route("/agency/floodMapping/difference", post(handlers::flood_difference))
        .route("/agency/floodMapping/image", post(handlers::flood_mapping_image))

        // Contour lines
        .route("/agency/fetch-contour-lines", post(handlers::fetch_contour_lines))

        // Disaster reports
        .route("/agency/reports", post(handlers::create_report))
        .route("/agency/locationMapping", get(handlers::location_mappings))

        .with_state(state)
}
