//! Overlay references.
//!
//! The pixel data of a rendered mask never enters this system; an overlay is
//! just the URL the map UI loads plus the parameters that produced it.

use serde::{Deserialize, Serialize};

use crate::models::band::Band;
use crate::models::geometry::BoundingBox;
use crate::models::window::DateWindow;

/// A server-rendered raster, identified by its retrieval URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayRef {
    /// Tile URL template or static thumbnail URL; opaque to this system.
    pub url: String,
    /// Rendering bounds, recomputed from the request geometry.
    pub bounds: BoundingBox,
    pub parameters: OverlayParameters,
}

/// The inputs that produced an overlay, echoed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polarization: Option<Band>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_used: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_window_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows: Option<(DateWindow, DateWindow)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contour_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_elevation: Option<u32>,
    pub palette: Vec<String>,
}

impl OverlayParameters {
    /// Parameters of a flood change mask.
    pub fn flood(
        band: Band,
        threshold: f64,
        windows: (DateWindow, DateWindow),
        palette: Vec<String>,
    ) -> Self {
        Self {
            polarization: Some(band),
            threshold_used: Some(threshold),
            date_window_days: None,
            resolution: Some("30m focal mean".to_string()),
            windows: Some(windows),
            contour_interval: None,
            max_elevation: None,
            palette,
        }
    }

    /// Parameters of a contour-line overlay.
    pub fn contour(interval: u32, max_elevation: u32, palette: Vec<String>) -> Self {
        Self {
            polarization: None,
            threshold_used: None,
            date_window_days: None,
            resolution: None,
            windows: None,
            contour_interval: Some(interval),
            max_elevation: Some(max_elevation),
            palette,
        }
    }

    pub fn with_date_window_days(mut self, days: u32) -> Self {
        self.date_window_days = Some(days);
        self
    }
}
