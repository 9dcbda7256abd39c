//! Frame assembly for the orbis map pipeline.
//!
//! Walks a [`orbis_geometry::FeatureCollection`] through the sphere pipeline
//! and packs the result into GPU-ready vertex buffers: outline segments,
//! stencil-and-cover fill fans and point markers. Window and GPU setup are
//! left to the caller.

mod assemble;
mod builder;
mod frame;
mod vertex;
mod viewport;

pub use assemble::{MIN_PARALLEL_FEATURES, build_frame, build_frame_parallel, resolve_workers};
pub use builder::FrameBuilder;
pub use frame::{FrameGeometry, FramePalette, FrameStats};
pub use vertex::{FillVertex, LineVertex, MarkerVertex};
pub use viewport::{Viewport, view_projection};
