//! Raster backends.
//!
//! A backend materializes a [`RasterGraph`](crate::graph::RasterGraph) into
//! a rendered overlay URL. Production delegates to the remote compute
//! provider; the grid backend evaluates in-process.

pub mod grid;
pub mod remote;

use async_trait::async_trait;
use floodwatch_core::error::ComputeError;
use floodwatch_geo::ValidRing;

use crate::graph::{RasterGraph, Visualization};

pub use grid::GridBackend;
pub use remote::RemoteRasterBackend;

#[async_trait]
pub trait RasterBackend: Send + Sync {
    /// Complete the provider handshake if it has not run yet. Safe to call
    /// concurrently; callers issued before the backend is ready suspend on
    /// the same initialization.
    async fn ensure_ready(&self) -> Result<(), ComputeError>;

    /// Materialize a graph into a rendered overlay URL. This is the only
    /// point where deferred raster algebra actually executes.
    async fn render(
        &self,
        graph: &RasterGraph,
        visualization: &Visualization,
        region: &ValidRing,
    ) -> Result<String, ComputeError>;
}
