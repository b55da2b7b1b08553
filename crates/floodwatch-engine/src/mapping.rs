//! Overlay orchestration.
//!
//! Ties the acquisition port and the raster backend together: check coverage
//! for every window involved, build the deferred graph, and only then ask
//! the backend to materialize a URL.

use std::sync::Arc;

use chrono::NaiveDate;
use floodwatch_core::error::ComputeError;
use floodwatch_core::models::{Band, DateWindow, OverlayParameters, OverlayRef};
use floodwatch_geo::ValidRing;
use floodwatch_imagery::{AccessToken, ImageryAcquisition};

use crate::backend::RasterBackend;
use crate::graph::{contour_graph, flood_graph, overflow_graph, Visualization, DEFAULT_FLOOD_THRESHOLD};

/// Days either side of a requested date that make up its observation window.
pub const WINDOW_DAYS: u64 = 5;

pub const CONTOUR_INTERVAL_M: u32 = 100;
pub const MAX_ELEVATION_M: u32 = 5000;

const FLOOD1_PALETTE: [&str; 2] = ["#000000", "#4169E1"];
const FLOOD2_PALETTE: [&str; 2] = ["#000000", "#3CB371"];
const OVERFLOW_PALETTE: [&str; 2] = ["#000000", "#FF4500"];

/// The three overlays of a two-date comparison.
#[derive(Debug, Clone)]
pub struct FloodDifference {
    pub flood1: OverlayRef,
    pub flood2: OverlayRef,
    pub overflow: OverlayRef,
}

pub struct MappingService {
    imagery: Arc<dyn ImageryAcquisition>,
    backend: Arc<dyn RasterBackend>,
}

impl MappingService {
    pub fn new(imagery: Arc<dyn ImageryAcquisition>, backend: Arc<dyn RasterBackend>) -> Self {
        Self { imagery, backend }
    }

    /// Change mask between two observation windows.
    ///
    /// Both windows must have catalog coverage; the graph is only built and
    /// rendered once that is known.
    pub async fn compute_change_mask(
        &self,
        ring: &ValidRing,
        before: DateWindow,
        after: DateWindow,
        band: Band,
        threshold: f64,
    ) -> Result<OverlayRef, ComputeError> {
        let token = self.imagery.access_token().await?;
        self.require_coverage(&token, ring, &before).await?;
        self.require_coverage(&token, ring, &after).await?;

        self.render_flood(ring, before, after, band, threshold, &["white", "blue"])
            .await
    }

    /// Single-date flood overlay: the ±5-day windows either side of `date`.
    pub async fn flood_mapping(
        &self,
        ring: &ValidRing,
        date: NaiveDate,
    ) -> Result<OverlayRef, ComputeError> {
        tracing::info!(date = %date, "computing flood overlay");
        self.compute_change_mask(
            ring,
            DateWindow::before(date, WINDOW_DAYS),
            DateWindow::after(date, WINDOW_DAYS),
            Band::Vv,
            DEFAULT_FLOOD_THRESHOLD,
        )
        .await
    }

    /// Two-date comparison: flood masks around each date plus the overflow
    /// mask of pixels newly flooded between them.
    pub async fn flood_difference(
        &self,
        ring: &ValidRing,
        date1: NaiveDate,
        date2: NaiveDate,
    ) -> Result<FloodDifference, ComputeError> {
        tracing::info!(date1 = %date1, date2 = %date2, "computing flood difference");

        let token = self.imagery.access_token().await?;
        self.require_coverage(&token, ring, &DateWindow::around(date1, WINDOW_DAYS)).await?;
        self.require_coverage(&token, ring, &DateWindow::around(date2, WINDOW_DAYS)).await?;

        let windows1 = (
            DateWindow::before(date1, WINDOW_DAYS),
            DateWindow::after(date1, WINDOW_DAYS),
        );
        let windows2 = (
            DateWindow::before(date2, WINDOW_DAYS),
            DateWindow::after(date2, WINDOW_DAYS),
        );

        let graph1 = flood_graph(windows1.0, windows1.1, Band::Vv, DEFAULT_FLOOD_THRESHOLD);
        let graph2 = flood_graph(windows2.0, windows2.1, Band::Vv, DEFAULT_FLOOD_THRESHOLD);
        let overflow = overflow_graph(&graph1, &graph2);

        let bounds = ring.bounding_box();
        let vis1 = Visualization::mask(FLOOD1_PALETTE[0], FLOOD1_PALETTE[1]);
        let vis2 = Visualization::mask(FLOOD2_PALETTE[0], FLOOD2_PALETTE[1]);
        let vis3 = Visualization::mask(OVERFLOW_PALETTE[0], OVERFLOW_PALETTE[1]);
        let (url1, url2, url3) = tokio::try_join!(
            self.backend.render(&graph1, &vis1, ring),
            self.backend.render(&graph2, &vis2, ring),
            self.backend.render(&overflow, &vis3, ring),
        )?;

        let overlay = |url: String, windows: (DateWindow, DateWindow), palette: [&str; 2]| OverlayRef {
            url,
            bounds,
            parameters: OverlayParameters::flood(
                Band::Vv,
                DEFAULT_FLOOD_THRESHOLD,
                windows,
                palette.iter().map(|c| c.to_string()).collect(),
            )
            .with_date_window_days(WINDOW_DAYS as u32),
        };

        Ok(FloodDifference {
            flood1: overlay(url1, windows1, FLOOD1_PALETTE),
            flood2: overlay(url2, windows2, FLOOD2_PALETTE),
            overflow: overlay(url3, windows2, OVERFLOW_PALETTE),
        })
    }

    /// Iso-elevation contour lines clipped to the region.
    pub async fn contour_lines(&self, ring: &ValidRing) -> Result<OverlayRef, ComputeError> {
        tracing::info!("generating contour lines");

        let graph = contour_graph(ring, CONTOUR_INTERVAL_M, MAX_ELEVATION_M);
        let visualization =
            Visualization::ramp(0.0, MAX_ELEVATION_M as f64, &["yellow", "red"]);
        let url = self.backend.render(&graph, &visualization, ring).await?;

        Ok(OverlayRef {
            url,
            bounds: ring.bounding_box(),
            parameters: OverlayParameters::contour(
                CONTOUR_INTERVAL_M,
                MAX_ELEVATION_M,
                vec!["yellow".to_string(), "red".to_string()],
            ),
        })
    }

    async fn require_coverage(
        &self,
        token: &AccessToken,
        ring: &ValidRing,
        window: &DateWindow,
    ) -> Result<(), ComputeError> {
        let bbox = ring.bounding_box();
        if self.imagery.has_coverage(token, &bbox, window).await? {
            Ok(())
        } else {
            tracing::warn!(window = %window, "no radar coverage");
            Err(ComputeError::NoCoverage {
                window: window.to_string(),
            })
        }
    }

    async fn render_flood(
        &self,
        ring: &ValidRing,
        before: DateWindow,
        after: DateWindow,
        band: Band,
        threshold: f64,
        palette: &[&str; 2],
    ) -> Result<OverlayRef, ComputeError> {
        let graph = flood_graph(before, after, band, threshold);
        let visualization = Visualization::mask(palette[0], palette[1]);
        let url = self.backend.render(&graph, &visualization, ring).await?;

        Ok(OverlayRef {
            url,
            bounds: ring.bounding_box(),
            parameters: OverlayParameters::flood(
                band,
                threshold,
                (before, after),
                palette.iter().map(|c| c.to_string()).collect(),
            ),
        })
    }
}
