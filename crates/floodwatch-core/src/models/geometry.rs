//! Polygon rings and bounding boxes.
//!
//! A `Ring` is the raw, user-submitted shape: an ordered sequence of
//! `[lon, lat]` pairs in GeoJSON axis order. Validation and closure live in
//! `floodwatch-geo`; this module only carries the data.

use serde::{Deserialize, Serialize};

/// A single `[lon, lat]` pair, longitude first (GeoJSON convention).
pub type Position = [f64; 2];

/// An ordered sequence of positions forming a polygon ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring(pub Vec<Position>);

impl Ring {
    pub fn new(positions: Vec<Position>) -> Self {
        Self(positions)
    }

    pub fn positions(&self) -> &[Position] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the first and last positions are component-wise equal.
    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }
}

impl From<Vec<Position>> for Ring {
    fn from(positions: Vec<Position>) -> Self {
        Self(positions)
    }
}

/// Axis-aligned bounding rectangle of a ring.
///
/// Always recomputed from the owning geometry, never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// The `[minLon, minLat, maxLon, maxLat]` array shape the catalog expects.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    /// Inclusive containment check.
    pub fn contains(&self, position: Position) -> bool {
        let [lon, lat] = position;
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}
