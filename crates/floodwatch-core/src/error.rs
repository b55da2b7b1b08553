//! Error types for Floodwatch
//!
//! One enum per failure domain: geometry rejection, provider auth, catalog
//! search, band processing, and overlay computation. The API crate maps each
//! to an HTTP status.

use chrono::NaiveDate;
use thiserror::Error;

/// Rejection of a user-submitted map region.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("a polygon needs at least 3 distinct points before closure, found {found}")]
    TooFewPoints { found: usize },

    #[error("coordinate {index} is not a finite [lon, lat] pair")]
    NonFinite { index: usize },

    #[error("coordinate {index} is outside lon [-180, 180] / lat [-90, 90]: [{lon}, {lat}]")]
    OutOfRange { index: usize, lon: f64, lat: f64 },
}

/// Identity-provider failures while acquiring an access token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token endpoint rate limited (HTTP 429) after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("identity provider rejected the client credentials: {detail}")]
    InvalidCredentials { detail: String },

    #[error("token request failed: {detail}")]
    Network { detail: String },

    #[error("token response was not the expected shape: {detail}")]
    MalformedResponse { detail: String },
}

/// Provider catalog search failures.
///
/// An explicit 404 or an empty feature list is "no coverage", which is not an
/// error; everything else surfaces through one of these variants.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog search failed with HTTP {status}: {detail}")]
    Provider { status: u16, detail: String },

    #[error("catalog search failed: {detail}")]
    Network { detail: String },

    #[error("catalog response was not the expected shape: {detail}")]
    MalformedResponse { detail: String },
}

/// Band processing (raster fetch) failures.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("band {name:?} is not a supported polarization (expected VV or VH)")]
    InvalidBand { name: String },

    #[error("processing response had content-type {content_type:?}, expected image/tiff")]
    UnexpectedContentType { content_type: String },

    #[error("processing request for band {band} on {date} failed with HTTP {status}: {detail}")]
    Provider {
        band: &'static str,
        date: NaiveDate,
        status: u16,
        detail: String,
    },

    #[error("processing request for band {band} failed: {detail}")]
    Network { band: &'static str, detail: String },
}

/// Overlay generation failures.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("no radar coverage for {window}")]
    NoCoverage { window: String },

    #[error("raster backend is not ready: {detail}")]
    BackendUnavailable { detail: String },

    #[error("overlay rendering failed: {detail}")]
    Render { detail: String },
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {key}")]
    Missing { key: String },

    #[error("invalid configuration value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}
