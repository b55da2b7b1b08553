//! Raster graph construction.
//!
//! A [`RasterGraph`] describes a computation over provider imagery without
//! touching any pixels. Smoothing lives inside [`CollectionSpec`], so the
//! smooth-then-mosaic ordering is structural and cannot be expressed the
//! wrong way round.

use floodwatch_core::models::{Band, DateWindow, Ring};
use floodwatch_geo::ValidRing;
use serde::{Deserialize, Serialize};

pub const SENTINEL1_COLLECTION: &str = "COPERNICUS/S1_GRD";
pub const ELEVATION_SOURCE: &str = "USGS/SRTMGL1_003";

/// Difference in backscatter dB above which a pixel counts as flooded.
pub const DEFAULT_FLOOD_THRESHOLD: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitPass {
    Ascending,
    Descending,
}

/// A filtered image collection, composited into one representative image.
///
/// Every image in the collection gets a square focal mean of
/// `smooth_radius_m` before compositing; the mosaic picks, per pixel, the
/// topmost covering image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSpec {
    pub collection: String,
    pub band: Band,
    pub window: DateWindow,
    pub orbit: OrbitPass,
    pub acquisition_mode: String,
    pub smooth_radius_m: u32,
}

impl CollectionSpec {
    /// Ascending-orbit IW Sentinel-1 scenes with 30 m pre-mosaic smoothing.
    pub fn sentinel1(band: Band, window: DateWindow) -> Self {
        Self {
            collection: SENTINEL1_COLLECTION.to_string(),
            band,
            window,
            orbit: OrbitPass::Ascending,
            acquisition_mode: "IW".to_string(),
            smooth_radius_m: 30,
        }
    }

    /// Lookup key used by in-process backends to resolve pixel data.
    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.collection, self.band, self.window)
    }
}

/// A deferred raster computation. Nothing executes until a backend renders
/// the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RasterGraph {
    /// Mosaic of a filtered, per-image smoothed collection.
    Collection(CollectionSpec),
    /// A static elevation image.
    Elevation { source: String },
    GaussianSmooth {
        input: Box<RasterGraph>,
        radius: u32,
        sigma: f64,
    },
    Subtract {
        left: Box<RasterGraph>,
        right: Box<RasterGraph>,
    },
    SubtractConst {
        input: Box<RasterGraph>,
        value: f64,
    },
    MultiplyConst {
        input: Box<RasterGraph>,
        value: f64,
    },
    /// 1 where the input strictly exceeds the threshold, else 0.
    GreaterThan {
        input: Box<RasterGraph>,
        threshold: f64,
    },
    /// 1 where the input changes sign against a neighbor, else 0.
    ZeroCrossing { input: Box<RasterGraph> },
    And {
        left: Box<RasterGraph>,
        right: Box<RasterGraph>,
    },
    Not { input: Box<RasterGraph> },
    /// Hide pixels where the input is zero.
    SelfMask { input: Box<RasterGraph> },
    /// Composite, later inputs on top.
    Mosaic { inputs: Vec<RasterGraph> },
    Clip {
        input: Box<RasterGraph>,
        region: Ring,
    },
}

impl RasterGraph {
    fn boxed(self) -> Box<RasterGraph> {
        Box::new(self)
    }
}

/// Rendering instructions attached to a graph when it is materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visualization {
    pub min: f64,
    pub max: f64,
    pub palette: Vec<String>,
    pub dimensions: u32,
}

impl Visualization {
    /// Two-color rendering of a 0/1 mask.
    pub fn mask(off: &str, on: &str) -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            palette: vec![off.to_string(), on.to_string()],
            dimensions: 1024,
        }
    }

    /// Continuous ramp between palette stops.
    pub fn ramp(min: f64, max: f64, palette: &[&str]) -> Self {
        Self {
            min,
            max,
            palette: palette.iter().map(|c| c.to_string()).collect(),
            dimensions: 1024,
        }
    }
}

/// `after.mosaic() - before.mosaic() > threshold`, with both collections
/// smoothed per image before compositing.
pub fn flood_graph(
    before: DateWindow,
    after: DateWindow,
    band: Band,
    threshold: f64,
) -> RasterGraph {
    let before = RasterGraph::Collection(CollectionSpec::sentinel1(band, before));
    let after = RasterGraph::Collection(CollectionSpec::sentinel1(band, after));

    RasterGraph::GreaterThan {
        input: RasterGraph::Subtract {
            left: after.boxed(),
            right: before.boxed(),
        }
        .boxed(),
        threshold,
    }
}

/// Pixels newly flooded between two masks: `flood2 AND NOT flood1`.
pub fn overflow_graph(flood1: &RasterGraph, flood2: &RasterGraph) -> RasterGraph {
    RasterGraph::And {
        left: flood2.clone().boxed(),
        right: RasterGraph::Not {
            input: flood1.clone().boxed(),
        }
        .boxed(),
    }
}

/// The iso-elevation levels `0, interval, 2*interval, ..., max_elevation`.
pub fn contour_levels(interval: u32, max_elevation: u32) -> Vec<f64> {
    (0..=max_elevation).step_by(interval as usize).map(f64::from).collect()
}

/// Iso-elevation contour lines over a smoothed elevation raster, clipped to
/// the region.
///
/// Per level: the zero-crossing of `(smoothed - level)` traces the contour;
/// scaling by the level makes the pixel value the elevation itself, and the
/// self-mask hides everything off the line. The per-level images are then
/// unioned into one.
pub fn contour_graph(region: &ValidRing, interval: u32, max_elevation: u32) -> RasterGraph {
    let smoothed = RasterGraph::GaussianSmooth {
        input: RasterGraph::Elevation {
            source: ELEVATION_SOURCE.to_string(),
        }
        .boxed(),
        radius: 5,
        sigma: 3.0,
    };

    let per_level: Vec<RasterGraph> = contour_levels(interval, max_elevation)
        .into_iter()
        .map(|level| RasterGraph::SelfMask {
            input: RasterGraph::MultiplyConst {
                input: RasterGraph::ZeroCrossing {
                    input: RasterGraph::SubtractConst {
                        input: smoothed.clone().boxed(),
                        value: level,
                    }
                    .boxed(),
                }
                .boxed(),
                value: level,
            }
            .boxed(),
        })
        .collect();

    RasterGraph::Clip {
        input: RasterGraph::Mosaic { inputs: per_level }.boxed(),
        region: region.ring().clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodwatch_core::models::Ring;
    use floodwatch_geo::validate;

    fn window(start: &str, end: &str) -> DateWindow {
        DateWindow::new(start.parse().unwrap(), end.parse().unwrap())
    }

    #[test]
    fn flood_graph_subtracts_before_from_after() {
        let before = window("2020-01-05", "2020-01-10");
        let after = window("2020-01-10", "2020-01-15");
        let graph = flood_graph(before, after, Band::Vv, 1.5);

        match graph {
            RasterGraph::GreaterThan { input, threshold } => {
                assert_eq!(threshold, 1.5);
                match *input {
                    RasterGraph::Subtract { left, right } => {
                        let RasterGraph::Collection(left) = *left else {
                            panic!("left side should be a collection mosaic");
                        };
                        let RasterGraph::Collection(right) = *right else {
                            panic!("right side should be a collection mosaic");
                        };
                        assert_eq!(left.window, after);
                        assert_eq!(right.window, before);
                    }
                    other => panic!("expected Subtract, got {:?}", other),
                }
            }
            other => panic!("expected GreaterThan, got {:?}", other),
        }
    }

    #[test]
    fn sentinel1_spec_filters_ascending_iw() {
        let spec = CollectionSpec::sentinel1(Band::Vv, window("2020-01-01", "2020-01-10"));
        assert_eq!(spec.collection, "COPERNICUS/S1_GRD");
        assert_eq!(spec.orbit, OrbitPass::Ascending);
        assert_eq!(spec.acquisition_mode, "IW");
        assert_eq!(spec.smooth_radius_m, 30);
    }

    #[test]
    fn contour_levels_cover_the_full_sweep() {
        let levels = contour_levels(100, 5000);
        assert_eq!(levels.len(), 51);
        assert_eq!(levels.first().copied(), Some(0.0));
        assert_eq!(levels.last().copied(), Some(5000.0));
    }

    #[test]
    fn contour_graph_is_clipped_to_the_region() {
        let region = validate(&Ring::new(vec![
            [106.80, -6.31],
            [106.81, -6.31],
            [106.81, -6.30],
        ]))
        .unwrap();

        let graph = contour_graph(&region, 100, 5000);
        match graph {
            RasterGraph::Clip { input, region: ring } => {
                assert!(ring.is_closed());
                match *input {
                    RasterGraph::Mosaic { inputs } => assert_eq!(inputs.len(), 51),
                    other => panic!("expected Mosaic, got {:?}", other),
                }
            }
            other => panic!("expected Clip, got {:?}", other),
        }
    }

    #[test]
    fn collection_keys_distinguish_windows() {
        let a = CollectionSpec::sentinel1(Band::Vv, window("2020-01-01", "2020-01-10"));
        let b = CollectionSpec::sentinel1(Band::Vv, window("2020-01-10", "2020-01-20"));
        assert_ne!(a.key(), b.key());
    }
}
