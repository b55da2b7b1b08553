//! Imagery port definitions
//!
//! Seams for everything with a side effect: wall-clock time, the identity
//! provider round trip, and the full acquisition flow the request handlers
//! and the mapping engine consume.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use floodwatch_core::error::{AuthError, CatalogError, ProcessingError};
use floodwatch_core::models::{Band, BoundingBox, DateWindow};
use floodwatch_geo::ValidRing;
use serde::Deserialize;

use crate::token::AccessToken;

/// Wall-clock source, injectable so expiry is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Raw grant returned by the client-credentials token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: u64,
}

/// One round trip to the identity provider.
#[async_trait]
pub trait TokenTransport: Send + Sync {
    async fn request_token(&self) -> Result<TokenGrant, AuthError>;
}

/// Imagery acquisition as the rest of the system sees it: token, coverage,
/// raster bytes. Implemented by [`crate::SentinelHub`] and by test doubles.
#[async_trait]
pub trait ImageryAcquisition: Send + Sync {
    /// Current access token, refreshed on expiry.
    async fn access_token(&self) -> Result<AccessToken, AuthError>;

    /// True iff the catalog reports at least one scene over `bbox` within
    /// `window`.
    async fn has_coverage(
        &self,
        token: &AccessToken,
        bbox: &BoundingBox,
        window: &DateWindow,
    ) -> Result<bool, CatalogError>;

    /// Orthorectified, speckle-filtered backscatter for one band on one
    /// calendar day.
    async fn fetch_band(
        &self,
        token: &AccessToken,
        ring: &ValidRing,
        date: NaiveDate,
        band: Band,
    ) -> Result<Vec<u8>, ProcessingError>;
}

/// Fetch a band named by the caller, e.g. from a request body. The name is
/// validated before anything touches the network.
pub async fn fetch_band_named(
    provider: &dyn ImageryAcquisition,
    token: &AccessToken,
    ring: &ValidRing,
    date: NaiveDate,
    name: &str,
) -> Result<Vec<u8>, ProcessingError> {
    let band: Band = name.parse()?;
    provider.fetch_band(token, ring, date, band).await
}
