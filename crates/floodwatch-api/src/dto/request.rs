use chrono::NaiveDate;
use floodwatch_core::models::{Ring, Severity};
use serde::Deserialize;

/// The `{lat, lng}` pair the map UI submits.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A user-drawn region as the clients send it.
#[derive(Debug, Deserialize)]
pub struct GeometryDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub coords: Vec<LatLng>,
}

impl GeometryDto {
    /// Reorder into `[lon, lat]` pairs.
    pub fn to_ring(&self) -> Ring {
        Ring::new(self.coords.iter().map(|c| [c.lng, c.lat]).collect())
    }
}

/// Flood overlay request body
#[derive(Debug, Deserialize)]
pub struct FloodMappingRequest {
    pub geometry: GeometryDto,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Two-date comparison request body
#[derive(Debug, Deserialize)]
pub struct FloodDifferenceRequest {
    pub geometry: GeometryDto,
    pub date1: NaiveDate,
    pub date2: NaiveDate,
}

/// Contour overlay request body
#[derive(Debug, Deserialize)]
pub struct ContourRequest {
    pub geometry: GeometryDto,
}

/// Raw band fetch request body
#[derive(Debug, Deserialize)]
pub struct BandImageRequest {
    pub geometry: GeometryDto,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Disaster report submission body
#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    pub user: String,
    pub location: LatLng,
    pub severity: Severity,
    pub description: String,
    #[serde(default)]
    pub file_ref: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_reorders_lat_lng_into_lon_lat() {
        let dto: GeometryDto = serde_json::from_str(
            r#"{"id": "region-1", "coords": [{"lat": -6.31, "lng": 106.80}, {"lat": -6.30, "lng": 106.81}]}"#,
        )
        .unwrap();

        let ring = dto.to_ring();
        assert_eq!(ring.positions()[0], [106.80, -6.31]);
        assert_eq!(ring.positions()[1], [106.81, -6.30]);
    }

    #[test]
    fn difference_request_parses_iso_dates() {
        let request: FloodDifferenceRequest = serde_json::from_str(
            r#"{"geometry": {"coords": []}, "date1": "2020-01-05", "date2": "2020-02-05"}"#,
        )
        .unwrap();
        assert_eq!(request.date1.to_string(), "2020-01-05");
        assert_eq!(request.date2.to_string(), "2020-02-05");
    }
}
