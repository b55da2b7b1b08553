//! The Sentinel Hub facade.
//!
//! Wires the token cache, catalog, and processor to one credential pair and
//! one HTTP client, and implements the [`ImageryAcquisition`] port the rest
//! of the system consumes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use floodwatch_core::config::ProviderSettings;
use floodwatch_core::error::{AuthError, CatalogError, ConfigError, ProcessingError};
use floodwatch_core::models::{Band, BoundingBox, DateWindow};
use floodwatch_geo::ValidRing;

use crate::catalog::SentinelCatalog;
use crate::ports::ImageryAcquisition;
use crate::process::SentinelProcessor;
use crate::token::{AccessToken, HttpTokenTransport, TokenCache};

pub struct SentinelHub {
    tokens: TokenCache,
    catalog: SentinelCatalog,
    processor: SentinelProcessor,
}

impl SentinelHub {
    pub fn new(settings: &ProviderSettings) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| ConfigError::Invalid {
                key: "request_timeout_secs".to_string(),
                reason: e.to_string(),
            })?;

        let transport = HttpTokenTransport::new(
            client.clone(),
            settings.token_url.clone(),
            settings.client_id.clone(),
            settings.client_secret.clone(),
        );

        Ok(Self {
            tokens: TokenCache::new(Arc::new(transport)),
            catalog: SentinelCatalog::new(client.clone(), settings.catalog_url.clone()),
            processor: SentinelProcessor::new(client, settings.process_url.clone()),
        })
    }
}

#[async_trait]
impl ImageryAcquisition for SentinelHub {
    async fn access_token(&self) -> Result<AccessToken, AuthError> {
        self.tokens.get_token().await
    }

    async fn has_coverage(
        &self,
        token: &AccessToken,
        bbox: &BoundingBox,
        window: &DateWindow,
    ) -> Result<bool, CatalogError> {
        self.catalog.has_coverage(token, bbox, window).await
    }

    async fn fetch_band(
        &self,
        token: &AccessToken,
        ring: &ValidRing,
        date: NaiveDate,
        band: Band,
    ) -> Result<Vec<u8>, ProcessingError> {
        self.processor.fetch_band(token, ring, date, band).await
    }
}
