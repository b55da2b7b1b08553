//! Band processing requests.
//!
//! One request fetches the terrain-corrected backscatter raster for a single
//! band on a single calendar day. The provider evaluates an evalscript
//! against the S1GRD collection and answers with a GeoTIFF; anything other
//! than `image/tiff` on a success status is a hard error.

use chrono::NaiveDate;
use floodwatch_core::error::ProcessingError;
use floodwatch_core::models::Band;
use floodwatch_geo::ValidRing;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::json;

use crate::provider::parse_provider_error;
use crate::token::AccessToken;

const TIFF_CONTENT_TYPE: &str = "image/tiff";
const OUTPUT_SIZE: u32 = 512;

/// The evalscript that selects one polarization channel as FLOAT32.
pub fn build_evalscript(band: Band) -> String {
    format!(
        r#"//VERSION=3
function setup() {{
  return {{
    input: ["{band}"],
    output: {{ bands: 1, sampleType: "FLOAT32" }}
  }};
}}
function evaluatePixel(sample) {{
  return [sample.{band}];
}}"#,
        band = band.as_str()
    )
}

/// Full processing request body for one band on one day.
pub fn build_process_body(ring: &ValidRing, date: NaiveDate, band: Band) -> serde_json::Value {
    let coordinates: Vec<[f64; 2]> = ring.ring().positions().to_vec();

    json!({
        "input": {
            "bounds": {
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [coordinates],
                },
                "properties": { "crs": "http://www.opengis.net/def/crs/EPSG/0/4326" }
            },
            "data": [{
                "type": "S1GRD",
                "dataFilter": {
                    "timeRange": {
                        "from": format!("{date}T00:00:00Z"),
                        "to": format!("{date}T23:59:59Z"),
                    },
                    "polarization": "DV",
                    "acquisitionMode": "IW",
                    // IW scenes are only served at HIGH resolution
                    "resolution": "HIGH"
                },
                "processing": {
                    "backCoeff": "GAMMA0_TERRAIN",
                    // GAMMA0_TERRAIN requires orthorectification
                    "orthorectify": true,
                    "demInstance": "COPERNICUS_30",
                    "speckleFilter": { "type": "LEE", "windowSizeX": 5, "windowSizeY": 5 }
                }
            }]
        },
        "output": { "width": OUTPUT_SIZE, "height": OUTPUT_SIZE, "format": "TIFF" },
        "evalscript": build_evalscript(band),
    })
}

/// Client for the Sentinel Hub process endpoint.
pub struct SentinelProcessor {
    client: reqwest::Client,
    url: String,
}

impl SentinelProcessor {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Fetch the raster for one band. The caller supplies a parsed [`Band`],
    /// so an unsupported polarization can never reach this method.
    pub async fn fetch_band(
        &self,
        token: &AccessToken,
        ring: &ValidRing,
        date: NaiveDate,
        band: Band,
    ) -> Result<Vec<u8>, ProcessingError> {
        tracing::info!(band = %band, date = %date, "processing polarization");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(token.secret())
            .header(ACCEPT, TIFF_CONTENT_TYPE)
            .json(&build_process_body(ring, date, band))
            .send()
            .await
            .map_err(|e| ProcessingError::Network {
                band: band.as_str(),
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let detail = parse_provider_error(&body);
            tracing::error!(band = %band, status = status.as_u16(), detail = %detail, "polarization processing failed");
            return Err(ProcessingError::Provider {
                band: band.as_str(),
                date,
                status: status.as_u16(),
                detail,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if content_type != TIFF_CONTENT_TYPE {
            return Err(ProcessingError::UnexpectedContentType { content_type });
        }

        let bytes = response.bytes().await.map_err(|e| ProcessingError::Network {
            band: band.as_str(),
            detail: e.to_string(),
        })?;

        tracing::debug!(band = %band, bytes = bytes.len(), "raster received");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodwatch_core::models::Ring;
    use floodwatch_geo::validate;

    fn ring() -> ValidRing {
        validate(&Ring::new(vec![
            [106.80, -6.31],
            [106.81, -6.31],
            [106.81, -6.30],
            [106.80, -6.30],
        ]))
        .unwrap()
    }

    #[test]
    fn evalscript_selects_the_requested_band() {
        let script = build_evalscript(Band::Vh);
        assert!(script.contains(r#"input: ["VH"]"#));
        assert!(script.contains("sample.VH"));
        assert!(script.starts_with("//VERSION=3"));
    }

    #[test]
    fn process_body_scopes_a_single_day() {
        let body = build_process_body(&ring(), "2020-01-10".parse().unwrap(), Band::Vv);

        let filter = &body["input"]["data"][0]["dataFilter"];
        assert_eq!(filter["timeRange"]["from"], "2020-01-10T00:00:00Z");
        assert_eq!(filter["timeRange"]["to"], "2020-01-10T23:59:59Z");
        assert_eq!(filter["polarization"], "DV");
        assert_eq!(filter["acquisitionMode"], "IW");
    }

    #[test]
    fn process_body_requests_terrain_corrected_backscatter() {
        let body = build_process_body(&ring(), "2020-01-10".parse().unwrap(), Band::Vv);

        let processing = &body["input"]["data"][0]["processing"];
        assert_eq!(processing["backCoeff"], "GAMMA0_TERRAIN");
        assert_eq!(processing["orthorectify"], true);
        assert_eq!(processing["speckleFilter"]["type"], "LEE");
        assert_eq!(processing["speckleFilter"]["windowSizeX"], 5);
        assert_eq!(processing["speckleFilter"]["windowSizeY"], 5);
    }

    #[test]
    fn process_body_carries_the_closed_polygon() {
        let body = build_process_body(&ring(), "2020-01-10".parse().unwrap(), Band::Vv);

        let coords = body["input"]["bounds"]["geometry"]["coordinates"][0]
            .as_array()
            .unwrap();
        assert_eq!(coords.len(), 5);
        assert_eq!(coords.first(), coords.last());
        assert_eq!(body["output"]["format"], "TIFF");
    }
}
