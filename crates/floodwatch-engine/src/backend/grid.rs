//! In-process raster backend.
//!
//! Evaluates graphs over registered pixel grids instead of calling the
//! remote provider. Rendered grids are retained so tests and the self-hosted
//! path can inspect what an overlay URL refers to.

use std::sync::Mutex;

use async_trait::async_trait;
use floodwatch_core::error::ComputeError;
use floodwatch_geo::ValidRing;

use crate::backend::RasterBackend;
use crate::eval::{evaluate, Grid, GridSources};
use crate::graph::{RasterGraph, Visualization};

pub struct GridBackend {
    sources: GridSources,
    rendered: Mutex<Vec<Grid>>,
}

impl GridBackend {
    pub fn new(sources: GridSources) -> Self {
        Self {
            sources,
            rendered: Mutex::new(Vec::new()),
        }
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered.lock().unwrap().len()
    }

    /// The most recently rendered grid, if any.
    pub fn last_rendered(&self) -> Option<Grid> {
        self.rendered.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl RasterBackend for GridBackend {
    async fn ensure_ready(&self) -> Result<(), ComputeError> {
        Ok(())
    }

    async fn render(
        &self,
        graph: &RasterGraph,
        _visualization: &Visualization,
        _region: &ValidRing,
    ) -> Result<String, ComputeError> {
        let grid = evaluate(graph, &self.sources).map_err(|e| ComputeError::Render {
            detail: e.to_string(),
        })?;

        let mut rendered = self.rendered.lock().unwrap();
        rendered.push(grid);
        Ok(format!("grid://overlay/{}", rendered.len() - 1))
    }
}
