//! Floodwatch imagery - Copernicus Data Space clients
//!
//! This crate owns every conversation with the Sentinel Hub APIs: the OAuth2
//! token cache, the catalog availability search, and the band processing
//! requests. The rest of the system consumes it through the
//! [`ImageryAcquisition`] port.

pub mod catalog;
pub mod hub;
pub mod ports;
pub mod process;
pub mod provider;
pub mod token;

pub use hub::SentinelHub;
pub use ports::{fetch_band_named, Clock, ImageryAcquisition, SystemClock, TokenGrant, TokenTransport};
pub use provider::parse_provider_error;
pub use token::{AccessToken, HttpTokenTransport, TokenCache};
