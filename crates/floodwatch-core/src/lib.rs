//! Floodwatch core - canonical models, error taxonomy, and configuration
//!
//! Everything the other crates agree on lives here: the polygon ring and
//! bounding box types, date windows, radar bands, overlay references, the
//! disaster report record, and the provider configuration.

pub mod config;
pub mod error;
pub mod models;

pub use config::ProviderSettings;
pub use error::{AuthError, CatalogError, ComputeError, ConfigError, GeometryError, ProcessingError};
pub use models::{Band, BoundingBox, DateWindow, OverlayParameters, OverlayRef, Ring};
