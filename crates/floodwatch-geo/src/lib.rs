//! Floodwatch geo - polygon validation and bounding boxes
//!
//! This crate turns raw user-drawn rings into validated, closed polygons and
//! derives the bounding boxes the catalog queries need.

pub mod convert;
pub mod validation;

pub use convert::to_geojson_polygon;
pub use validation::{bounding_box, close_ring, validate, ValidRing};
