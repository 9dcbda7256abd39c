//! Geometry tree and GeoJSON loading for the orbis map pipeline.
//!
//! A document is parsed once into a [`FeatureCollection`] whose coordinates
//! are already in radians. Renderers walk the tree through
//! [`GeometryVisitor`] and never see JSON.

mod error;
mod geojson;
mod geometry;

pub use error::{ErrorKind, FeatureError, GeoJsonError};
pub use geojson::{
    LoadReport, MIN_LINE_POSITIONS, MIN_RING_POSITIONS, load_geojson_file, parse_geojson,
};
pub use geometry::{
    Feature, FeatureCollection, Geometry, GeometryVisitor, Line, Polygon, Ring, RingRole,
};
