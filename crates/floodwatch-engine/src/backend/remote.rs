//! Remote raster backend.
//!
//! The compute provider wants a two-step handshake (authenticate with key
//! material, then initialize a session) before it accepts render calls. Both
//! steps hide behind [`RasterBackend::ensure_ready`]; the once-cell makes
//! concurrent first callers share one handshake instead of racing it.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use floodwatch_core::config::ProviderSettings;
use floodwatch_core::error::{ComputeError, ConfigError};
use floodwatch_geo::ValidRing;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::OnceCell;

use crate::backend::RasterBackend;
use crate::graph::{RasterGraph, Visualization};

pub struct RemoteRasterBackend {
    client: reqwest::Client,
    base_url: String,
    key_file: Option<PathBuf>,
    ready: OnceCell<()>,
}

#[derive(Debug, Deserialize)]
struct MapResponse {
    mapid: String,
    token: String,
}

impl RemoteRasterBackend {
    pub fn new(settings: &ProviderSettings) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| ConfigError::Invalid {
                key: "request_timeout_secs".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: settings.render_url.trim_end_matches('/').to_string(),
            key_file: settings.render_key_file.clone().map(PathBuf::from),
            ready: OnceCell::new(),
        })
    }

    async fn handshake(&self) -> Result<(), ComputeError> {
        tracing::info!("initializing raster backend");

        let key = match &self.key_file {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
                    ComputeError::BackendUnavailable {
                        detail: format!("failed to read key file {}: {}", path.display(), e),
                    }
                })?;
                serde_json::from_str::<serde_json::Value>(&raw).map_err(|e| {
                    ComputeError::BackendUnavailable {
                        detail: format!("key file is not valid JSON: {e}"),
                    }
                })?
            }
            None => json!({}),
        };

        self.post_step("authenticate", json!({ "key": key })).await?;
        tracing::debug!("raster backend authentication successful");

        self.post_step("initialize", json!({})).await?;
        tracing::info!("raster backend initialized");
        Ok(())
    }

    async fn post_step(&self, step: &str, body: serde_json::Value) -> Result<(), ComputeError> {
        let response = self
            .client
            .post(format!("{}/v1/{}", self.base_url, step))
            .json(&body)
            .send()
            .await
            .map_err(|e| ComputeError::BackendUnavailable {
                detail: format!("{step} failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ComputeError::BackendUnavailable {
                detail: format!("{step} returned HTTP {status}: {detail}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RasterBackend for RemoteRasterBackend {
    async fn ensure_ready(&self) -> Result<(), ComputeError> {
        self.ready.get_or_try_init(|| self.handshake()).await?;
        Ok(())
    }

    async fn render(
        &self,
        graph: &RasterGraph,
        visualization: &Visualization,
        region: &ValidRing,
    ) -> Result<String, ComputeError> {
        self.ensure_ready().await?;

        let body = json!({
            "graph": graph,
            "visualization": visualization,
            "region": region.ring(),
        });

        let response = self
            .client
            .post(format!("{}/v1/maps", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ComputeError::Render {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ComputeError::Render {
                detail: format!("map request returned HTTP {status}: {detail}"),
            });
        }

        let map: MapResponse = response.json().await.map_err(|e| ComputeError::Render {
            detail: format!("map response was not the expected shape: {e}"),
        })?;

        Ok(format!(
            "{}/map/{}/{{z}}/{{x}}/{{y}}?token={}",
            self.base_url, map.mapid, map.token
        ))
    }
}
