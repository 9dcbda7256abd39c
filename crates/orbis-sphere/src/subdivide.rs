//! Adaptive great-circle subdivision.
//!
//! An arc between two sphere points is split at its spherical midpoint until
//! the projected midpoint lies within `tolerance` of the straight 2D segment
//! midpoint. Error is measured after projection because projections distort
//! curvature unevenly, most visibly near the orthographic silhouette.
//!
//! Subdivision runs on an explicit work stack with a depth cap. Past the cap
//! the current approximation is accepted as is.

use std::f64::consts::PI;

use glam::DVec3;

use crate::mapper::SpherePoint;
use crate::projection::ProjectionKind;

/// Default maximum subdivision depth per arc (up to `2^16` leaves).
pub const DEFAULT_MAX_DEPTH: u32 = 16;

/// Hard upper bound accepted for the subdivision depth.
pub const MAX_DEPTH_LIMIT: u32 = 24;

/// Below this angle (radians) two points are treated as coincident, and
/// within it of `π` as antipodal.
const DEGENERATE_ANGLE: f64 = 1e-6;

/// Parameters controlling arc subdivision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubdivisionParams {
    /// Projection in which the error is measured.
    pub projection: ProjectionKind,
    /// Maximum allowed distance, in world units, between a projected arc
    /// midpoint and the straight segment midpoint.
    pub tolerance: f64,
    /// Maximum split depth per arc.
    pub max_depth: u32,
}

impl SubdivisionParams {
    /// Create parameters with [`DEFAULT_MAX_DEPTH`].
    pub fn new(projection: ProjectionKind, tolerance: f64) -> Self {
        Self {
            projection,
            tolerance,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A pending piece of an arc on the work stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    /// Left endpoint.
    pub start: SpherePoint,
    /// Right endpoint.
    pub end: SpherePoint,
    /// Number of splits that produced this span.
    pub depth: u32,
}

/// Spherical linear interpolation along the great circle from `a` to `b`.
///
/// Near-coincident endpoints fall back to linear interpolation. Antipodal
/// endpoints do not define a unique great circle. When both lie on the
/// horizon the arc follows the horizon counterclockwise as seen from the
/// viewer (`+z`), which keeps it in the visible hemisphere and closes an
/// RFC 7946 exterior ring around the disc interior. Other antipodal pairs run
/// through `a.any_orthonormal_vector()`.
#[must_use]
pub fn slerp(a: SpherePoint, b: SpherePoint, t: f64) -> SpherePoint {
    let theta = a.dot(b).clamp(-1.0, 1.0).acos();
    if theta < DEGENERATE_ANGLE {
        return a.lerp(b, t);
    }

    if PI - theta < DEGENERATE_ANGLE {
        let axis = antipodal_axis(a, b);
        let (sin_angle, cos_angle) = (t * theta).sin_cos();
        return a * cos_angle + axis * sin_angle;
    }

    (a * ((1.0 - t) * theta).sin() + b * (t * theta).sin()) / theta.sin()
}

/// Direction in which the arc from `a` to its antipode `b` leaves `a`.
fn antipodal_axis(a: SpherePoint, b: SpherePoint) -> DVec3 {
    let on_horizon = a.z.abs() < DEGENERATE_ANGLE && b.z.abs() < DEGENERATE_ANGLE;
    if on_horizon && let Some(axis) = DVec3::Z.cross(a).try_normalize() {
        return axis;
    }
    a.any_orthonormal_vector()
}

/// Whether the projected arc `a → b` is straight enough to draw as one segment.
pub fn arc_is_flat_enough(
    a: SpherePoint,
    b: SpherePoint,
    projection: ProjectionKind,
    tolerance: f64,
) -> bool {
    let pa = projection.project(a);
    let pb = projection.project(b);
    let pm = projection.project(slerp(a, b, 0.5));
    let linear_mid = (pa + pb) * 0.5;
    pm.distance_squared(linear_mid) < tolerance * tolerance
}

/// Subdivide the arc `a → b`, appending the left endpoint of every accepted
/// leaf to `out`. `b` itself is not appended.
///
/// Returns the number of leaves accepted only because they hit the depth cap.
pub fn subdivide_arc_into(
    a: SpherePoint,
    b: SpherePoint,
    params: SubdivisionParams,
    stack: &mut Vec<Span>,
    out: &mut Vec<SpherePoint>,
) -> usize {
    let max_depth = params.max_depth.min(MAX_DEPTH_LIMIT);
    let mut capped = 0;

    stack.clear();
    stack.push(Span {
        start: a,
        end: b,
        depth: 0,
    });

    while let Some(span) = stack.pop() {
        if arc_is_flat_enough(span.start, span.end, params.projection, params.tolerance) {
            out.push(span.start);
            continue;
        }
        if span.depth >= max_depth {
            capped += 1;
            out.push(span.start);
            continue;
        }

        let mid = slerp(span.start, span.end, 0.5);
        // Right half first so the left half is popped (and emitted) first.
        stack.push(Span {
            start: mid,
            end: span.end,
            depth: span.depth + 1,
        });
        stack.push(Span {
            start: span.start,
            end: mid,
            depth: span.depth + 1,
        });
    }

    capped
}

/// Subdivide a single arc. The result starts at `a` and excludes `b`.
#[must_use]
pub fn subdivide_arc(
    a: SpherePoint,
    b: SpherePoint,
    params: SubdivisionParams,
) -> Vec<SpherePoint> {
    let mut out = Vec::new();
    subdivide_arc_into(a, b, params, &mut Vec::new(), &mut out);
    out
}

/// Subdivide every edge of a closed ring, wraparound edge included, in
/// winding order. Clears `out` first.
pub fn subdivide_polygon_into(
    ring: &[SpherePoint],
    params: SubdivisionParams,
    stack: &mut Vec<Span>,
    out: &mut Vec<SpherePoint>,
) -> usize {
    out.clear();
    let n = ring.len();
    let mut capped = 0;
    for (i, &a) in ring.iter().enumerate() {
        capped += subdivide_arc_into(a, ring[(i + 1) % n], params, stack, out);
    }
    capped
}

/// Subdivide every edge of a closed ring.
#[must_use]
pub fn subdivide_polygon(ring: &[SpherePoint], params: SubdivisionParams) -> Vec<SpherePoint> {
    let mut out = Vec::new();
    subdivide_polygon_into(ring, params, &mut Vec::new(), &mut out);
    out
}

/// Subdivide the consecutive edges of an open polyline and append its final
/// point. Clears `out` first.
pub fn subdivide_polyline_into(
    line: &[SpherePoint],
    params: SubdivisionParams,
    stack: &mut Vec<Span>,
    out: &mut Vec<DVec3>,
) -> usize {
    out.clear();
    let mut capped = 0;
    for pair in line.windows(2) {
        capped += subdivide_arc_into(pair[0], pair[1], params, stack, out);
    }
    if let Some(&last) = line.last() {
        out.push(last);
    }
    capped
}

/// Subdivide an open polyline.
#[must_use]
pub fn subdivide_polyline(line: &[SpherePoint], params: SubdivisionParams) -> Vec<SpherePoint> {
    let mut out = Vec::new();
    subdivide_polyline_into(line, params, &mut Vec::new(), &mut out);
    out
}
