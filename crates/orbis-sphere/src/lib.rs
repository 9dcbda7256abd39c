//! Spherical projection and hemisphere clipping for geographic vector data.
//!
//! Rings of longitude/latitude pass through a fixed pipeline: unit-sphere
//! mapping, view rotation, hemisphere classification, horizon clipping,
//! adaptive great-circle subdivision and finally projection to 2D world
//! coordinates. Every stage is a pure function of its input and a
//! [`ViewContext`].

mod clip;
mod context;
mod mapper;
mod pipeline;
mod projection;
mod subdivide;
mod visibility;

pub use clip::{clip_polyline, clip_polyline_into, clip_ring, clip_ring_into, horizon_intersection};
pub use context::ViewContext;
pub use mapper::{
    GeoCoordinate, SpherePoint, UNIT_TOLERANCE, build_view_rotation, geo_to_sphere, is_unit,
    normalize_lon, renormalize, rotate, rotate_into, sphere_to_geo,
};
pub use pipeline::{
    RingScratch, process_line, process_line_into, process_ring, process_ring_into, project_point,
};
pub use projection::{ProjectionKind, project};
pub use subdivide::{
    DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT, Span, SubdivisionParams, arc_is_flat_enough, slerp,
    subdivide_arc, subdivide_arc_into, subdivide_polygon, subdivide_polygon_into,
    subdivide_polyline, subdivide_polyline_into,
};
pub use visibility::{VisibilityClass, classify, is_visible};
