use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use floodwatch_core::models::DisasterReport;

use crate::dto::{CreateReportRequest, LocationEntry};
use crate::error::ApiError;
use crate::state::AppState;

/// Store a user-submitted disaster report.
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<DisasterReport>), ApiError> {
    let mut report = DisasterReport::new(
        request.user,
        [request.location.lng, request.location.lat],
        request.severity,
        request.description,
    );
    if let Some(file_ref) = request.file_ref {
        report = report.with_file_ref(file_ref);
    }

    tracing::info!(id = %report.id, severity = ?report.severity, "storing disaster report");

    state.reports.add(report.clone()).await;
    Ok((StatusCode::CREATED, Json(report)))
}

/// Every stored report's location and severity, for the agency map.
pub async fn location_mappings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LocationEntry>>, ApiError> {
    let entries = state
        .reports
        .list()
        .await
        .into_iter()
        .map(|report| LocationEntry {
            location: report.location,
            severity: report.severity,
        })
        .collect();

    Ok(Json(entries))
}
