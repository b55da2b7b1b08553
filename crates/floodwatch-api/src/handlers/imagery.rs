use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use floodwatch_core::models::DateWindow;
use floodwatch_geo::validate;

use crate::dto::{BandImageRequest, BandImageResponse};
use crate::error::ApiError;
use crate::services::save_band_pair;
use crate::state::AppState;

/// Fetch both polarizations for one day and save them locally.
pub async fn flood_mapping_image(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BandImageRequest>,
) -> Result<Json<BandImageResponse>, ApiError> {
    let ring = validate(&request.geometry.to_ring())?;
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());

    tracing::info!(date = %date, "processing band image request");

    let token = state.imagery.access_token().await?;

    let bbox = ring.bounding_box();
    let window = DateWindow::single_day(date);
    if !state.imagery.has_coverage(&token, &bbox, &window).await? {
        return Err(ApiError::not_found("No dual-polarization (DV) data found"));
    }

    let paths = save_band_pair(&*state.imagery, &token, &ring, date, &state.image_dir).await?;

    Ok(Json(BandImageResponse {
        success: true,
        paths,
    }))
}
