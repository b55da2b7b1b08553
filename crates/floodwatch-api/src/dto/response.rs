use chrono::NaiveDate;
use floodwatch_core::models::{Position, Severity};
use serde::Serialize;

/// Flood overlay response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloodMappingResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub flood_map_url: String,
}

/// The dates a comparison was requested for, echoed back.
#[derive(Debug, Serialize)]
pub struct DifferenceDates {
    pub date1: NaiveDate,
    pub date2: NaiveDate,
}

/// The fixed processing parameters of a comparison.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferenceParameters {
    pub polarization: &'static str,
    pub threshold_used: f64,
    pub date_window_days: u32,
    pub resolution: &'static str,
}

impl Default for DifferenceParameters {
    fn default() -> Self {
        Self {
            polarization: "VV",
            threshold_used: 1.5,
            date_window_days: 5,
            resolution: "30m focal mean",
        }
    }
}

/// Two-date comparison response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloodDifferenceResponse {
    pub flood_map1: String,
    pub flood_map2: String,
    pub overflow_map: String,
    pub dates: DifferenceDates,
    pub geometry: geojson::Geometry,
    pub parameters: DifferenceParameters,
}

/// Contour overlay response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContourResponse {
    pub contour_line_url: String,
}

/// Raw band fetch response
#[derive(Debug, Serialize)]
pub struct BandImageResponse {
    pub success: bool,
    pub paths: Vec<String>,
}

/// One stored report's location and severity, for the agency map.
#[derive(Debug, Serialize)]
pub struct LocationEntry {
    pub location: Position,
    pub severity: Severity,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            service: "floodwatch-api",
        }
    }
}
