use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use floodwatch_geo::{to_geojson_polygon, validate};

use crate::dto::{
    DifferenceDates, DifferenceParameters, FloodDifferenceRequest, FloodDifferenceResponse,
    FloodMappingRequest, FloodMappingResponse,
};
use crate::error::ApiError;
use crate::state::AppState;

/// Single flood overlay for a drawn region.
pub async fn flood_mapping(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FloodMappingRequest>,
) -> Result<Json<FloodMappingResponse>, ApiError> {
    let ring = validate(&request.geometry.to_ring())?;
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());

    tracing::info!(
        id = request.geometry.id.as_deref().unwrap_or("-"),
        date = %date,
        "processing flood mapping request"
    );

    let overlay = state.mapping.flood_mapping(&ring, date).await?;

    Ok(Json(FloodMappingResponse {
        id: request.geometry.id,
        flood_map_url: overlay.url,
    }))
}

/// Flood masks around two dates plus the overflow between them.
pub async fn flood_difference(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FloodDifferenceRequest>,
) -> Result<Json<FloodDifferenceResponse>, ApiError> {
    let ring = validate(&request.geometry.to_ring())?;

    tracing::info!(
        date1 = %request.date1,
        date2 = %request.date2,
        "processing flood difference request"
    );

    let difference = state
        .mapping
        .flood_difference(&ring, request.date1, request.date2)
        .await?;

    let geometry = to_geojson_polygon(&ring);

    Ok(Json(FloodDifferenceResponse {
        flood_map1: difference.flood1.url,
        flood_map2: difference.flood2.url,
        overflow_map: difference.overflow.url,
        dates: DifferenceDates {
            date1: request.date1,
            date2: request.date2,
        },
        geometry,
        parameters: DifferenceParameters::default(),
    }))
}
