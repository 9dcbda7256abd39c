//! Hemisphere visibility of rotated points and rings.

use crate::mapper::SpherePoint;

/// Visibility of a ring against the view hemisphere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisibilityClass {
    /// Every vertex is in front of the horizon.
    Visible,
    /// The ring straddles the horizon and must be clipped.
    Partial,
    /// No vertex is in front of the horizon.
    Occluded,
}

/// A rotated point is visible iff `z > 0`. Points exactly on the horizon are not.
#[inline]
pub fn is_visible(point: SpherePoint) -> bool {
    point.z > 0.0
}

/// Classify a ring of rotated points. An empty ring is [`VisibilityClass::Occluded`].
pub fn classify(points: &[SpherePoint]) -> VisibilityClass {
    let mut any_visible = false;
    let mut any_hidden = false;

    for &p in points {
        if is_visible(p) {
            any_visible = true;
        } else {
            any_hidden = true;
        }
        if any_visible && any_hidden {
            return VisibilityClass::Partial;
        }
    }

    if any_visible {
        VisibilityClass::Visible
    } else {
        VisibilityClass::Occluded
    }
}
