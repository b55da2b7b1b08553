//! GeoJSON interchange for validated rings.

use geojson::{Geometry, Value};

use crate::validation::ValidRing;

/// Render a validated ring as a GeoJSON Polygon geometry, the shape the map
/// UI consumes in responses.
pub fn to_geojson_polygon(ring: &ValidRing) -> Geometry {
    let exterior: Vec<Vec<f64>> =
        ring.ring().positions().iter().map(|&[lon, lat]| vec![lon, lat]).collect();
    Geometry::new(Value::Polygon(vec![exterior]))
}
