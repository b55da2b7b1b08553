use std::sync::Arc;

use axum::{extract::State, Json};
use floodwatch_geo::validate;

use crate::dto::{ContourRequest, ContourResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Iso-elevation contour lines for a drawn region.
pub async fn fetch_contour_lines(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContourRequest>,
) -> Result<Json<ContourResponse>, ApiError> {
    let ring = validate(&request.geometry.to_ring())?;

    let overlay = state.mapping.contour_lines(&ring).await?;

    Ok(Json(ContourResponse {
        contour_line_url: overlay.url,
    }))
}
