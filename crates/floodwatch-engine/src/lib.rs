//! Floodwatch engine - deferred raster computation
//!
//! Flood change detection and contour generation are expressed as raster
//! graphs: a description of collection filters, algebra, and thresholds that
//! is only materialized when an overlay URL is actually requested. The
//! [`RasterBackend`] port does the materializing — remotely against the
//! imagery provider in production, in-process over synthetic grids in tests.

pub mod backend;
pub mod eval;
pub mod graph;
pub mod mapping;

pub use backend::{GridBackend, RasterBackend, RemoteRasterBackend};
pub use eval::{evaluate, Grid, GridSources};
pub use graph::{
    contour_graph, contour_levels, flood_graph, overflow_graph, CollectionSpec, OrbitPass,
    RasterGraph, Visualization,
};
pub use mapping::{FloodDifference, MappingService};
