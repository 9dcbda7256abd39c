//! Per-frame vertex buffers and statistics.

use glam::Mat4;
use orbis_sphere::VisibilityClass;

use crate::vertex::{FillVertex, LineVertex, MarkerVertex};

/// Colors for the cover passes and the outline pass, RGBA linear.
///
/// Pixels marked by the stencil pass get `land`, the rest of the globe gets
/// `ocean`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePalette {
    pub land: [f32; 4],
    pub ocean: [f32; 4],
    pub outline: [f32; 4],
}

impl Default for FramePalette {
    fn default() -> Self {
        Self {
            land: [0.36, 0.55, 0.32, 1.0],
            ocean: [0.07, 0.18, 0.36, 1.0],
            outline: [0.05, 0.05, 0.05, 1.0],
        }
    }
}

/// Everything the renderer needs to draw one frame.
///
/// `segments` holds outline and line segments as vertex pairs, `fan` holds
/// stencil-and-cover fill triangles as vertex triples, and `markers` holds one
/// vertex per visible point.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameGeometry {
    pub segments: Vec<LineVertex>,
    pub fan: Vec<FillVertex>,
    pub markers: Vec<MarkerVertex>,
    pub view_projection: Mat4,
    pub palette: FramePalette,
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
            fan: Vec::new(),
            markers: Vec::new(),
            view_projection: Mat4::IDENTITY,
            palette: FramePalette::default(),
        }
    }
}

impl FrameGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty the buffers for the next frame, keeping their allocations.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.fan.clear();
        self.markers.clear();
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len() / 2
    }

    pub fn triangle_count(&self) -> usize {
        self.fan.len() / 3
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.fan.is_empty() && self.markers.is_empty()
    }

    /// Move all vertices of `other` to the end of this frame, leaving `other` empty.
    ///
    /// The view-projection matrix and palette of `self` are kept.
    pub fn append(&mut self, other: &mut FrameGeometry) {
        self.segments.append(&mut other.segments);
        self.fan.append(&mut other.fan);
        self.markers.append(&mut other.markers);
    }

    /// Raw bytes of the segment buffer, ready for upload.
    pub fn segment_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.segments)
    }

    /// Raw bytes of the fill buffer, ready for upload.
    pub fn fan_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.fan)
    }

    /// Raw bytes of the marker buffer, ready for upload.
    pub fn marker_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.markers)
    }
}

/// Counters collected while building a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub features: usize,
    /// Exterior rings and holes seen.
    pub rings: usize,
    pub holes: usize,
    pub visible_rings: usize,
    pub partial_rings: usize,
    pub occluded_rings: usize,
    pub lines: usize,
    /// Visible runs produced by lines after clipping.
    pub line_runs: usize,
    pub points: usize,
    pub hidden_points: usize,
    pub segments: usize,
    pub triangles: usize,
}

impl FrameStats {
    pub(crate) fn record_ring(&mut self, class: VisibilityClass) {
        self.rings += 1;
        match class {
            VisibilityClass::Visible => self.visible_rings += 1,
            VisibilityClass::Partial => self.partial_rings += 1,
            VisibilityClass::Occluded => self.occluded_rings += 1,
        }
    }

    /// Add the counters of `other` to these.
    pub fn merge(&mut self, other: &FrameStats) {
        self.features += other.features;
        self.rings += other.rings;
        self.holes += other.holes;
        self.visible_rings += other.visible_rings;
        self.partial_rings += other.partial_rings;
        self.occluded_rings += other.occluded_rings;
        self.lines += other.lines;
        self.line_runs += other.line_runs;
        self.points += other.points;
        self.hidden_points += other.hidden_points;
        self.segments += other.segments;
        self.triangles += other.triangles;
    }
}
