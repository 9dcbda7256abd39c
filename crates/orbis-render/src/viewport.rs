//! Screen viewport and the world-to-clip matrix for a projection.

use glam::{Mat4, Vec2};
use orbis_sphere::ProjectionKind;

use crate::frame::FramePalette;

/// Output surface size in pixels, a zoom factor and the frame palette.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    /// Magnification; 1.0 fits the whole projected world.
    pub zoom: f32,
    pub palette: FramePalette,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            zoom: 1.0,
            palette: FramePalette::default(),
        }
    }
}

impl Viewport {
    pub fn new(width: u32, height: u32, zoom: f32) -> Self {
        Self {
            width,
            height,
            zoom,
            palette: FramePalette::default(),
        }
    }

    pub fn with_palette(mut self, palette: FramePalette) -> Self {
        self.palette = palette;
        self
    }

    /// Width over height; 1.0 for a degenerate viewport.
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    fn effective_zoom(&self) -> f32 {
        if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        }
    }
}

/// Orthographic matrix that fits the projected world of `projection` into
/// `viewport`, centred on the origin.
///
/// The world is letterboxed rather than stretched: whichever axis has room to
/// spare is widened to keep the viewport's aspect ratio.
pub fn view_projection(projection: ProjectionKind, viewport: &Viewport) -> Mat4 {
    let extent = projection.half_extent().as_vec2() / viewport.effective_zoom();
    let aspect = viewport.aspect_ratio();

    let half = if aspect >= extent.x / extent.y {
        Vec2::new(extent.y * aspect, extent.y)
    } else {
        Vec2::new(extent.x, extent.x / aspect)
    };
    Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, -1.0, 1.0)
}
