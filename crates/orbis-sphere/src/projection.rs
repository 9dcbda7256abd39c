//! Map projections from rotated view space to 2D world coordinates.
//!
//! Provides two projections:
//! - **Orthographic**: the globe seen from infinitely far away. Only the
//!   hemisphere facing the viewer is drawn, so it has occlusion.
//! - **Equirectangular**: longitude and latitude mapped linearly. Covers the
//!   whole sphere, so nothing is ever occluded.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::mapper::{SpherePoint, sphere_to_geo};

/// Selects which map projection to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectionKind {
    /// Orthogonal drop of `z`. World extent is the unit disc.
    #[default]
    Orthographic,
    /// `(λ, φ)` of the rotated point. World extent is `[-π, π] × [-π/2, π/2]`.
    Equirectangular,
}

impl ProjectionKind {
    /// All supported projections, in display order.
    pub const ALL: [ProjectionKind; 2] = [
        ProjectionKind::Orthographic,
        ProjectionKind::Equirectangular,
    ];

    /// Whether the projection hides the far hemisphere. Only projections with
    /// occlusion run the visibility and clipping stages.
    #[inline]
    pub fn has_occlusion(self) -> bool {
        matches!(self, ProjectionKind::Orthographic)
    }

    /// Project a rotated sphere point to 2D world coordinates.
    ///
    /// For [`ProjectionKind::Orthographic`] the caller is responsible for
    /// passing only points with `z >= 0`.
    #[inline]
    #[must_use]
    pub fn project(self, point: SpherePoint) -> DVec2 {
        match self {
            ProjectionKind::Orthographic => point.truncate(),
            ProjectionKind::Equirectangular => {
                let geo = sphere_to_geo(point);
                DVec2::new(geo.lon, geo.lat)
            }
        }
    }

    /// Half-width and half-height of the projected world, centred on the origin.
    pub fn half_extent(self) -> DVec2 {
        match self {
            ProjectionKind::Orthographic => DVec2::ONE,
            ProjectionKind::Equirectangular => DVec2::new(PI, FRAC_PI_2),
        }
    }

    /// Short human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            ProjectionKind::Orthographic => "orthographic",
            ProjectionKind::Equirectangular => "equirectangular",
        }
    }
}

/// Project `point` with the given projection.
#[inline]
#[must_use]
pub fn project(point: SpherePoint, kind: ProjectionKind) -> DVec2 {
    kind.project(point)
}
