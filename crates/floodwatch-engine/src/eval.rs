//! In-process graph evaluation over pixel grids.
//!
//! Production overlays are rendered by the provider; this evaluator exists
//! for the self-hosted path and for exercising graph semantics against
//! synthetic grids. Masked pixels are NaN.

use std::collections::HashMap;

use floodwatch_core::models::{BoundingBox, Position, Ring};
use thiserror::Error;

use crate::graph::RasterGraph;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("no pixel source registered for {key}")]
    MissingSource { key: String },

    #[error("grid shapes differ: {left_width}x{left_height} vs {right_width}x{right_height}")]
    ShapeMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },

    #[error("cannot clip a grid without georeferenced bounds")]
    UnreferencedGrid,
}

/// A single-band raster in row-major order. NaN marks masked pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    data: Vec<f32>,
    /// Ground size of one pixel, used to translate metric smoothing radii.
    pixel_size_m: f32,
    /// Geographic extent, required for clipping.
    bounds: Option<BoundingBox>,
}

impl Grid {
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
            pixel_size_m: 30.0,
            bounds: None,
        }
    }

    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
            pixel_size_m: 30.0,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[y * self.width + x] = value;
    }

    /// Count of unmasked pixels with a non-zero value.
    pub fn count_active(&self) -> usize {
        self.data.iter().filter(|v| v.is_finite() && **v != 0.0).count()
    }

    /// Count of masked (NaN) pixels.
    pub fn count_masked(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }

    fn same_shape(&self, other: &Grid) -> Result<(), EvalError> {
        if self.width != other.width || self.height != other.height {
            return Err(EvalError::ShapeMismatch {
                left_width: self.width,
                left_height: self.height,
                right_width: other.width,
                right_height: other.height,
            });
        }
        Ok(())
    }

    fn map(&self, f: impl Fn(f32) -> f32) -> Grid {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
            pixel_size_m: self.pixel_size_m,
            bounds: self.bounds,
        }
    }

    fn zip(&self, other: &Grid, f: impl Fn(f32, f32) -> f32) -> Result<Grid, EvalError> {
        self.same_shape(other)?;
        Ok(Grid {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            pixel_size_m: self.pixel_size_m,
            bounds: self.bounds.or(other.bounds),
        })
    }

    /// Geographic position of a pixel center. Row 0 is the northern edge.
    fn pixel_center(&self, x: usize, y: usize, bounds: &BoundingBox) -> Position {
        let lon = bounds.min_lon
            + (x as f64 + 0.5) / self.width as f64 * (bounds.max_lon - bounds.min_lon);
        let lat = bounds.max_lat
            - (y as f64 + 0.5) / self.height as f64 * (bounds.max_lat - bounds.min_lat);
        [lon, lat]
    }
}

/// Pixel data the evaluator resolves graph leaves against.
#[derive(Debug, Default)]
pub struct GridSources {
    collections: HashMap<String, Grid>,
    elevations: HashMap<String, Grid>,
}

impl GridSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the composited image for a collection spec key.
    pub fn insert_collection(&mut self, key: impl Into<String>, grid: Grid) {
        self.collections.insert(key.into(), grid);
    }

    /// Register an elevation image by source name.
    pub fn insert_elevation(&mut self, source: impl Into<String>, grid: Grid) {
        self.elevations.insert(source.into(), grid);
    }
}

/// Evaluate a graph bottom-up into a grid.
pub fn evaluate(graph: &RasterGraph, sources: &GridSources) -> Result<Grid, EvalError> {
    match graph {
        RasterGraph::Collection(spec) => {
            let grid = sources
                .collections
                .get(&spec.key())
                .ok_or_else(|| EvalError::MissingSource { key: spec.key() })?;
            let radius_px =
                ((spec.smooth_radius_m as f32 / grid.pixel_size_m).round() as usize).max(1);
            Ok(focal_mean(grid, radius_px))
        }
        RasterGraph::Elevation { source } => sources
            .elevations
            .get(source)
            .cloned()
            .ok_or_else(|| EvalError::MissingSource {
                key: source.clone(),
            }),
        RasterGraph::GaussianSmooth {
            input,
            radius,
            sigma,
        } => {
            let grid = evaluate(input, sources)?;
            Ok(gaussian_smooth(&grid, *radius as usize, *sigma))
        }
        RasterGraph::Subtract { left, right } => {
            let left = evaluate(left, sources)?;
            let right = evaluate(right, sources)?;
            left.zip(&right, |a, b| a - b)
        }
        RasterGraph::SubtractConst { input, value } => {
            let value = *value as f32;
            Ok(evaluate(input, sources)?.map(|v| v - value))
        }
        RasterGraph::MultiplyConst { input, value } => {
            let value = *value as f32;
            Ok(evaluate(input, sources)?.map(|v| v * value))
        }
        RasterGraph::GreaterThan { input, threshold } => {
            let threshold = *threshold as f32;
            Ok(evaluate(input, sources)?.map(|v| {
                if v.is_nan() {
                    f32::NAN
                } else if v > threshold {
                    1.0
                } else {
                    0.0
                }
            }))
        }
        RasterGraph::ZeroCrossing { input } => Ok(zero_crossing(&evaluate(input, sources)?)),
        RasterGraph::And { left, right } => {
            let left = evaluate(left, sources)?;
            let right = evaluate(right, sources)?;
            left.zip(&right, |a, b| {
                if a.is_nan() || b.is_nan() {
                    f32::NAN
                } else if a != 0.0 && b != 0.0 {
                    1.0
                } else {
                    0.0
                }
            })
        }
        RasterGraph::Not { input } => Ok(evaluate(input, sources)?.map(|v| {
            if v.is_nan() {
                f32::NAN
            } else if v == 0.0 {
                1.0
            } else {
                0.0
            }
        })),
        RasterGraph::SelfMask { input } => Ok(evaluate(input, sources)?.map(|v| {
            if v == 0.0 {
                f32::NAN
            } else {
                v
            }
        })),
        RasterGraph::Mosaic { inputs } => mosaic(inputs, sources),
        RasterGraph::Clip { input, region } => clip(&evaluate(input, sources)?, region),
    }
}

/// Square focal mean over unmasked neighbors, borders clamped.
fn focal_mean(grid: &Grid, radius: usize) -> Grid {
    let mut out = grid.clone();
    let radius = radius as isize;
    for y in 0..grid.height {
        for x in 0..grid.width {
            let mut sum = 0.0f32;
            let mut count = 0u32;
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    if nx < 0 || ny < 0 || nx >= grid.width as isize || ny >= grid.height as isize {
                        continue;
                    }
                    let v = grid.get(nx as usize, ny as usize);
                    if v.is_finite() {
                        sum += v;
                        count += 1;
                    }
                }
            }
            out.set(x, y, if count > 0 { sum / count as f32 } else { f32::NAN });
        }
    }
    out
}

/// Gaussian convolution with a normalized `(2r+1)²` kernel, borders clamped.
fn gaussian_smooth(grid: &Grid, radius: usize, sigma: f64) -> Grid {
    let radius = radius as isize;
    let mut weights = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d2 = (dx * dx + dy * dy) as f64;
            weights.push((dx, dy, (-d2 / (2.0 * sigma * sigma)).exp() as f32));
        }
    }

    let mut out = grid.clone();
    for y in 0..grid.height {
        for x in 0..grid.width {
            let mut sum = 0.0f32;
            let mut weight_sum = 0.0f32;
            for &(dx, dy, w) in &weights {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || ny < 0 || nx >= grid.width as isize || ny >= grid.height as isize {
                    continue;
                }
                let v = grid.get(nx as usize, ny as usize);
                if v.is_finite() {
                    sum += v * w;
                    weight_sum += w;
                }
            }
            out.set(x, y, if weight_sum > 0.0 { sum / weight_sum } else { f32::NAN });
        }
    }
    out
}

/// 1 where a pixel's sign differs from a 4-neighbor (or the value is exactly
/// zero), else 0. NaN pixels stay NaN.
fn zero_crossing(grid: &Grid) -> Grid {
    let mut out = grid.clone();
    for y in 0..grid.height {
        for x in 0..grid.width {
            let v = grid.get(x, y);
            if v.is_nan() {
                continue;
            }
            if v == 0.0 {
                out.set(x, y, 1.0);
                continue;
            }
            let mut crossing = false;
            let neighbors: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
            for (dx, dy) in neighbors {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || ny < 0 || nx >= grid.width as isize || ny >= grid.height as isize {
                    continue;
                }
                let n = grid.get(nx as usize, ny as usize);
                if n.is_finite() && (n == 0.0 || (n > 0.0) != (v > 0.0)) {
                    crossing = true;
                    break;
                }
            }
            out.set(x, y, if crossing { 1.0 } else { 0.0 });
        }
    }
    out
}

/// Composite inputs, later images on top; a pixel keeps the topmost
/// unmasked value.
fn mosaic(inputs: &[RasterGraph], sources: &GridSources) -> Result<Grid, EvalError> {
    let mut grids = Vec::with_capacity(inputs.len());
    for input in inputs {
        grids.push(evaluate(input, sources)?);
    }

    let Some(first) = grids.first() else {
        return Ok(Grid::filled(0, 0, f32::NAN));
    };

    let mut out = first.map(|_| f32::NAN);
    for grid in &grids {
        out = out.zip(grid, |below, above| if above.is_nan() { below } else { above })?;
    }
    Ok(out)
}

/// Mask out pixels whose center falls outside the region ring.
fn clip(grid: &Grid, region: &Ring) -> Result<Grid, EvalError> {
    let bounds = grid.bounds.ok_or(EvalError::UnreferencedGrid)?;
    let mut out = grid.clone();
    for y in 0..grid.height {
        for x in 0..grid.width {
            let center = grid.pixel_center(x, y, &bounds);
            if !point_in_ring(region, center) {
                out.set(x, y, f32::NAN);
            }
        }
    }
    Ok(out)
}

/// Ray-casting point-in-polygon test against a closed ring.
fn point_in_ring(ring: &Ring, point: Position) -> bool {
    let positions = ring.positions();
    if positions.len() < 4 {
        return false;
    }
    let [px, py] = point;
    let mut inside = false;
    for pair in positions.windows(2) {
        let [x1, y1] = pair[0];
        let [x2, y2] = pair[1];
        if (y1 > py) != (y2 > py) {
            let intersect_x = x1 + (py - y1) / (y2 - y1) * (x2 - x1);
            if px < intersect_x {
                inside = !inside;
            }
        }
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{contour_graph, flood_graph, CollectionSpec, ELEVATION_SOURCE};
    use floodwatch_core::models::{Band, DateWindow};
    use floodwatch_geo::validate;

    fn window(start: &str, end: &str) -> DateWindow {
        DateWindow::new(start.parse().unwrap(), end.parse().unwrap())
    }

    fn flood_sources(before_db: f32, after_db: f32) -> (GridSources, DateWindow, DateWindow) {
        let before_window = window("2020-01-05", "2020-01-10");
        let after_window = window("2020-01-10", "2020-01-15");

        let mut sources = GridSources::new();
        sources.insert_collection(
            CollectionSpec::sentinel1(Band::Vv, before_window).key(),
            Grid::filled(8, 8, before_db),
        );
        sources.insert_collection(
            CollectionSpec::sentinel1(Band::Vv, after_window).key(),
            Grid::filled(8, 8, after_db),
        );
        (sources, before_window, after_window)
    }

    #[test]
    fn flood_mask_is_all_ones_above_the_threshold() {
        let (sources, before, after) = flood_sources(-20.0, -17.0);
        let graph = flood_graph(before, after, Band::Vv, 1.5);

        let mask = evaluate(&graph, &sources).unwrap();
        assert_eq!(mask.count_active(), 64);
    }

    #[test]
    fn flood_mask_is_empty_below_the_threshold() {
        let (sources, before, after) = flood_sources(-20.0, -19.0);
        let graph = flood_graph(before, after, Band::Vv, 1.5);

        let mask = evaluate(&graph, &sources).unwrap();
        assert_eq!(mask.count_active(), 0);
    }

    #[test]
    fn threshold_is_strict() {
        // Difference of exactly 1.5 is not a change.
        let (sources, before, after) = flood_sources(-20.0, -18.5);
        let graph = flood_graph(before, after, Band::Vv, 1.5);

        let mask = evaluate(&graph, &sources).unwrap();
        assert_eq!(mask.count_active(), 0);
    }

    #[test]
    fn missing_collection_is_an_error() {
        let graph = flood_graph(
            window("2020-01-05", "2020-01-10"),
            window("2020-01-10", "2020-01-15"),
            Band::Vv,
            1.5,
        );
        let err = evaluate(&graph, &GridSources::new()).unwrap_err();
        assert!(matches!(err, EvalError::MissingSource { .. }));
    }

    #[test]
    fn uniform_elevation_has_no_contours() {
        // 250 m everywhere sits between the 200 and 300 levels; nothing crosses.
        let region = validate(&floodwatch_core::models::Ring::new(vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
        ]))
        .unwrap();
        let bounds = region.bounding_box();

        let mut sources = GridSources::new();
        sources.insert_elevation(
            ELEVATION_SOURCE,
            Grid::filled(16, 16, 250.0).with_bounds(bounds),
        );

        let result = evaluate(&contour_graph(&region, 100, 5000), &sources).unwrap();
        assert_eq!(result.count_active(), 0);
    }

    #[test]
    fn sloped_elevation_produces_contours() {
        // West-to-east ramp from 0 to 750 m crosses several levels.
        let region = validate(&floodwatch_core::models::Ring::new(vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
        ]))
        .unwrap();
        let bounds = region.bounding_box();

        let mut sources = GridSources::new();
        sources.insert_elevation(
            ELEVATION_SOURCE,
            Grid::from_fn(32, 32, |x, _| x as f32 * 25.0).with_bounds(bounds),
        );

        let result = evaluate(&contour_graph(&region, 100, 5000), &sources).unwrap();
        assert!(result.count_active() > 0);
    }

    #[test]
    fn clip_masks_pixels_outside_the_region() {
        // Region covers only the western half of the grid extent.
        let region = validate(&floodwatch_core::models::Ring::new(vec![
            [0.0, 0.0],
            [0.5, 0.0],
            [0.5, 1.0],
            [0.0, 1.0],
        ]))
        .unwrap();

        let grid = Grid::filled(10, 10, 1.0).with_bounds(BoundingBox {
            min_lon: 0.0,
            min_lat: 0.0,
            max_lon: 1.0,
            max_lat: 1.0,
        });

        let clipped = clip(&grid, region.ring()).unwrap();
        assert_eq!(clipped.count_masked(), 50);
        assert_eq!(clipped.count_active(), 50);
    }

    #[test]
    fn mosaic_puts_later_inputs_on_top() {
        let mut sources = GridSources::new();
        sources.insert_elevation("base", Grid::filled(4, 4, 1.0));
        sources.insert_elevation("top", Grid::filled(4, 4, 2.0));

        let graph = RasterGraph::Mosaic {
            inputs: vec![
                RasterGraph::Elevation {
                    source: "base".to_string(),
                },
                RasterGraph::Elevation {
                    source: "top".to_string(),
                },
            ],
        };

        let out = evaluate(&graph, &sources).unwrap();
        assert_eq!(out.get(0, 0), 2.0);
    }

    #[test]
    fn masked_pixels_fall_through_a_mosaic() {
        let mut sources = GridSources::new();
        sources.insert_elevation("base", Grid::filled(4, 4, 1.0));
        sources.insert_elevation("holes", Grid::filled(4, 4, 0.0));

        // Self-masking the zero grid turns it fully transparent.
        let graph = RasterGraph::Mosaic {
            inputs: vec![
                RasterGraph::Elevation {
                    source: "base".to_string(),
                },
                RasterGraph::SelfMask {
                    input: Box::new(RasterGraph::Elevation {
                        source: "holes".to_string(),
                    }),
                },
            ],
        };

        let out = evaluate(&graph, &sources).unwrap();
        assert_eq!(out.get(2, 2), 1.0);
    }
}
