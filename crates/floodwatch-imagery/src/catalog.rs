//! Catalog availability search.

use floodwatch_core::error::CatalogError;
use floodwatch_core::models::{BoundingBox, DateWindow};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::token::AccessToken;

const COLLECTION: &str = "sentinel-1-grd";

/// Body of a catalog search scoped to a bbox and a date window.
pub fn build_search_body(bbox: &BoundingBox, window: &DateWindow) -> serde_json::Value {
    json!({
        "bbox": bbox.to_array(),
        "datetime": window.to_interval(),
        "collections": [COLLECTION],
    })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    features: Vec<serde_json::Value>,
}

/// Client for the Sentinel Hub catalog endpoint.
pub struct SentinelCatalog {
    client: reqwest::Client,
    url: String,
}

impl SentinelCatalog {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// True iff at least one scene covers `bbox` within `window`.
    ///
    /// An explicit 404 means the catalog knows nothing about the query and is
    /// reported as no coverage; any other failure propagates.
    pub async fn has_coverage(
        &self,
        token: &AccessToken,
        bbox: &BoundingBox,
        window: &DateWindow,
    ) -> Result<bool, CatalogError> {
        tracing::info!(window = %window, "checking data availability");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(token.secret())
            .json(&build_search_body(bbox, window))
            .send()
            .await
            .map_err(|e| CatalogError::Network {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CatalogError::Provider {
                status: status.as_u16(),
                detail,
            });
        }

        let body: SearchResponse =
            response.json().await.map_err(|e| CatalogError::MalformedResponse {
                detail: e.to_string(),
            })?;

        tracing::debug!(features = body.features.len(), "catalog search returned");
        Ok(!body.features.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_body_shape() {
        let bbox = BoundingBox {
            min_lon: 106.80,
            min_lat: -6.31,
            max_lon: 106.81,
            max_lat: -6.30,
        };
        let window = DateWindow::new("2020-01-10".parse().unwrap(), "2020-01-20".parse().unwrap());

        let body = build_search_body(&bbox, &window);

        assert_eq!(body["bbox"], json!([106.80, -6.31, 106.81, -6.30]));
        assert_eq!(body["datetime"], "2020-01-10T00:00:00Z/2020-01-20T23:59:59Z");
        assert_eq!(body["collections"], json!(["sentinel-1-grd"]));
    }

    #[test]
    fn search_response_tolerates_extra_feature_fields() {
        let raw = r#"{"features": [{"id": "S1A_IW_GRDH", "properties": {"datetime": "x"}}], "links": []}"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.features.len(), 1);
    }
}
