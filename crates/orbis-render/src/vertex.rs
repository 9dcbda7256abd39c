//! Vertex formats handed to the external renderer.
//!
//! All vertices are plain `#[repr(C)]` data so a frame's buffers can be
//! uploaded with a single `bytemuck::cast_slice`.

use bytemuck::{Pod, Zeroable};
use glam::DVec2;

/// Endpoint of an outline or line segment. Segments are stored as pairs.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
}

impl LineVertex {
    pub fn new(position: DVec2) -> Self {
        Self {
            position: position.as_vec2().to_array(),
        }
    }
}

/// Corner of a fill triangle. Triangles are stored as triples whose first
/// vertex is the projection origin.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FillVertex {
    pub position: [f32; 2],
}

impl FillVertex {
    pub fn new(position: DVec2) -> Self {
        Self {
            position: position.as_vec2().to_array(),
        }
    }
}

/// A visible point feature.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MarkerVertex {
    pub position: [f32; 2],
}

impl MarkerVertex {
    pub fn new(position: DVec2) -> Self {
        Self {
            position: position.as_vec2().to_array(),
        }
    }
}
