//! Ring validation, closure, and bounding-box computation.

use floodwatch_core::error::GeometryError;
use floodwatch_core::models::{BoundingBox, Ring};

/// A ring that passed [`validate`]: closed, at least 3 distinct vertices,
/// every coordinate finite and inside lon [-180, 180] / lat [-90, 90].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRing(Ring);

impl ValidRing {
    pub fn ring(&self) -> &Ring {
        &self.0
    }

    pub fn into_ring(self) -> Ring {
        self.0
    }

    /// Bounding box of the validated ring. Cannot produce NaN bounds because
    /// non-finite coordinates never get this far.
    pub fn bounding_box(&self) -> BoundingBox {
        bounding_box(&self.0)
    }
}

/// Validate a user-submitted ring and close it.
///
/// Degenerate but well-formed polygons (zero area, repeated edges) pass;
/// whether they yield useful imagery is the provider's concern. The lon/lat
/// range check goes beyond what the upstream clients enforce, so a ring that
/// swaps axis order fails here instead of producing an empty scene.
pub fn validate(ring: &Ring) -> Result<ValidRing, GeometryError> {
    let open_len = if ring.is_closed() {
        ring.len() - 1
    } else {
        ring.len()
    };

    if open_len < 3 {
        tracing::warn!(points = open_len, "rejected ring with too few points");
        return Err(GeometryError::TooFewPoints { found: open_len });
    }

    for (index, &[lon, lat]) in ring.positions().iter().enumerate() {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(GeometryError::NonFinite { index });
        }
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(GeometryError::OutOfRange { index, lon, lat });
        }
    }

    Ok(ValidRing(close_ring(ring)))
}

/// Append the first position if the last does not already equal it
/// component-wise. Applying this twice yields the same ring as applying it
/// once.
pub fn close_ring(ring: &Ring) -> Ring {
    let mut positions = ring.positions().to_vec();
    if let (Some(&first), Some(&last)) = (positions.first(), positions.last()) {
        if first != last {
            positions.push(first);
        }
    }
    Ring::new(positions)
}

/// Min/max reduction over the ring in a single scan.
///
/// NaN coordinates propagate through `f64::min`/`f64::max`; [`validate`] must
/// run first.
pub fn bounding_box(ring: &Ring) -> BoundingBox {
    let mut bbox = BoundingBox {
        min_lon: f64::INFINITY,
        min_lat: f64::INFINITY,
        max_lon: f64::NEG_INFINITY,
        max_lat: f64::NEG_INFINITY,
    };

    for &[lon, lat] in ring.positions() {
        bbox.min_lon = bbox.min_lon.min(lon);
        bbox.min_lat = bbox.min_lat.min(lat);
        bbox.max_lon = bbox.max_lon.max(lon);
        bbox.max_lat = bbox.max_lat.max(lat);
    }

    bbox
}
