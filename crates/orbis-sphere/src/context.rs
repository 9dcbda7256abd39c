//! Per-frame view state threaded explicitly through the pipeline.

use glam::DMat3;

use crate::mapper::{GeoCoordinate, build_view_rotation};
use crate::projection::ProjectionKind;
use crate::subdivide::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT, SubdivisionParams};

/// Everything a pipeline call needs to know about the current view.
///
/// Built once per frame (or whenever the centre moves). Ring processing is a
/// pure function of a ring and this value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewContext {
    /// Geographic point shown at the centre of the view.
    pub centre: GeoCoordinate,
    /// Rotation carrying `centre` onto the view pole. Identity for projections
    /// without occlusion, where the pipeline reduces to geographic coordinates.
    pub rotation: DMat3,
    /// Active projection.
    pub projection: ProjectionKind,
    /// Projected-error tolerance in world units.
    pub tolerance: f64,
    /// Maximum great-circle subdivision depth.
    pub max_depth: u32,
}

impl ViewContext {
    /// Tolerance used when none (or an unusable one) is given.
    pub const DEFAULT_TOLERANCE: f64 = 1e-3;

    /// Smallest tolerance accepted. Anything tighter only burns the depth cap.
    pub const MIN_TOLERANCE: f64 = 1e-9;

    /// Build a context for `centre` under `projection`.
    pub fn new(centre: GeoCoordinate, projection: ProjectionKind, tolerance: f64) -> Self {
        Self {
            centre,
            rotation: rotation_for(centre, projection),
            projection,
            tolerance: sanitize_tolerance(tolerance),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the subdivision depth cap, clamped to `1..=MAX_DEPTH_LIMIT`.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth.clamp(1, MAX_DEPTH_LIMIT);
        self
    }

    /// Move the view centre and rebuild the rotation.
    pub fn recentre(&mut self, centre: GeoCoordinate) {
        self.centre = centre;
        self.rotation = rotation_for(centre, self.projection);
    }

    /// Switch projection, rebuilding the rotation for the current centre.
    pub fn set_projection(&mut self, projection: ProjectionKind) {
        self.projection = projection;
        self.rotation = rotation_for(self.centre, projection);
    }

    /// Subdivision parameters derived from this context.
    pub fn subdivision(&self) -> SubdivisionParams {
        SubdivisionParams {
            projection: self.projection,
            tolerance: self.tolerance,
            max_depth: self.max_depth,
        }
    }
}

impl Default for ViewContext {
    fn default() -> Self {
        Self::new(
            GeoCoordinate::default(),
            ProjectionKind::default(),
            Self::DEFAULT_TOLERANCE,
        )
    }
}

fn rotation_for(centre: GeoCoordinate, projection: ProjectionKind) -> DMat3 {
    if projection.has_occlusion() {
        build_view_rotation(centre)
    } else {
        DMat3::IDENTITY
    }
}

fn sanitize_tolerance(tolerance: f64) -> f64 {
    if tolerance.is_finite() && tolerance > 0.0 {
        tolerance.max(ViewContext::MIN_TOLERANCE)
    } else {
        ViewContext::DEFAULT_TOLERANCE
    }
}
