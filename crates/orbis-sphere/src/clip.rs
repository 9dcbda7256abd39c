//! Sutherland-Hodgman clipping of rotated rings against the horizon plane `z = 0`.
//!
//! A vertex that lies exactly on the horizon (`z == 0`) is a boundary vertex:
//! it is kept (snapped onto the horizon circle) and never produces a
//! synthetic intersection of its own. Crossings are only synthesized between
//! endpoints with strictly opposite, non-zero `z`.
//!
//! Rings whose visible part splits into several disjoint pieces come out as a
//! single ring connected along the horizon. Closed rings are never split.

use std::ops::Range;

use glam::DVec2;

use crate::mapper::SpherePoint;

/// Where the straight chord `a → b` crosses `z = 0`, pushed out onto the horizon circle.
///
/// Returns `None` unless `a.z` and `b.z` have strictly opposite, non-zero signs.
pub fn horizon_intersection(a: SpherePoint, b: SpherePoint) -> Option<SpherePoint> {
    if !(a.z * b.z < 0.0) {
        return None;
    }
    let t = a.z / (a.z - b.z);
    let xy = a.truncate().lerp(b.truncate(), t);
    Some(snap_to_horizon(xy, a))
}

/// Project `xy` onto the unit horizon circle.
///
/// A chord through the sphere centre (antipodal endpoints) has no defined
/// crossing direction; the horizontal direction of `reference` is used, then `+x`.
fn snap_to_horizon(xy: DVec2, reference: SpherePoint) -> SpherePoint {
    xy.try_normalize()
        .or_else(|| reference.truncate().try_normalize())
        .unwrap_or(DVec2::X)
        .extend(0.0)
}

/// Clip a closed ring, returning a new ring with every vertex at `z >= 0`.
#[must_use]
pub fn clip_ring(points: &[SpherePoint]) -> Vec<SpherePoint> {
    let mut out = Vec::with_capacity(points.len() + 2);
    clip_ring_into(points, &mut out);
    out
}

/// Clip a closed ring into `out`, reusing its allocation.
///
/// The wraparound edge from the last point back to the first is clipped like
/// any other edge, so the output stays closed.
pub fn clip_ring_into(points: &[SpherePoint], out: &mut Vec<SpherePoint>) {
    out.clear();
    let n = points.len();
    for (i, &curr) in points.iter().enumerate() {
        let next = points[(i + 1) % n];
        if curr.z > 0.0 {
            out.push(curr);
        } else if curr.z == 0.0 {
            out.push(snap_to_horizon(curr.truncate(), curr));
        }
        if let Some(crossing) = horizon_intersection(curr, next) {
            out.push(crossing);
        }
    }
}

/// Clip an open polyline into its visible runs.
///
/// Each run starts and ends either at an input endpoint or on the horizon.
/// Runs with fewer than two vertices are dropped.
#[must_use]
pub fn clip_polyline(points: &[SpherePoint]) -> Vec<Vec<SpherePoint>> {
    let mut out = Vec::with_capacity(points.len() + 2);
    let mut runs = Vec::new();
    clip_polyline_into(points, &mut out, &mut runs);
    runs.into_iter().map(|run| out[run].to_vec()).collect()
}

/// Clip an open polyline into `out`, recording each visible run as a range of `out`.
///
/// Both buffers are cleared first and keep their allocations.
pub fn clip_polyline_into(
    points: &[SpherePoint],
    out: &mut Vec<SpherePoint>,
    runs: &mut Vec<Range<usize>>,
) {
    out.clear();
    runs.clear();
    let mut start = 0;

    for (i, &curr) in points.iter().enumerate() {
        if curr.z > 0.0 {
            out.push(curr);
        } else if curr.z == 0.0 {
            out.push(snap_to_horizon(curr.truncate(), curr));
        }

        let Some(&next) = points.get(i + 1) else {
            break;
        };

        if let Some(crossing) = horizon_intersection(curr, next) {
            out.push(crossing);
            if curr.z > 0.0 {
                close_run(out, &mut start, runs);
            }
        } else if curr.z >= 0.0 && next.z < 0.0 {
            close_run(out, &mut start, runs);
        }
    }
    close_run(out, &mut start, runs);
}

fn close_run(out: &mut Vec<SpherePoint>, start: &mut usize, runs: &mut Vec<Range<usize>>) {
    if out.len() - *start >= 2 {
        runs.push(*start..out.len());
    } else {
        out.truncate(*start);
    }
    *start = out.len();
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use crate::mapper::{GeoCoordinate, build_view_rotation, geo_to_sphere, rotate};
    use crate::visibility::{VisibilityClass, classify};

    const EPSILON: f64 = 1e-9;

    fn view_ring(centre: GeoCoordinate, degrees: &[(f64, f64)]) -> Vec<DVec3> {
        let sphere: Vec<_> = degrees
            .iter()
            .map(|&(lon, lat)| geo_to_sphere(GeoCoordinate::from_degrees(lon, lat)))
            .collect();
        rotate(&sphere, &build_view_rotation(centre))
    }

    fn count_on_horizon(points: &[DVec3]) -> usize {
        points.iter().filter(|p| p.z == 0.0).count()
    }

    #[test]
    fn test_square_straddling_horizon_gains_two_vertices() {
        // Centre (0, 0): the horizon is the meridian pair at ±90° longitude.
        let ring = view_ring(
            GeoCoordinate::default(),
            &[(80.0, -10.0), (100.0, -10.0), (100.0, 10.0), (80.0, 10.0)],
        );
        assert_eq!(classify(&ring), VisibilityClass::Partial);

        let clipped = clip_ring(&ring);
        assert_eq!(clipped.len(), 4);
        assert_eq!(count_on_horizon(&clipped), 2);
    }

    #[test]
    fn test_clipped_vertices_are_in_front_and_unit() {
        let ring = view_ring(
            GeoCoordinate::from_degrees(20.0, 30.0),
            &[
                (60.0, 10.0),
                (140.0, 20.0),
                (170.0, 60.0),
                (90.0, 70.0),
                (40.0, 50.0),
            ],
        );
        assert_eq!(classify(&ring), VisibilityClass::Partial);
        let clipped = clip_ring(&ring);
        assert!(!clipped.is_empty());
        for p in &clipped {
            assert!(p.z >= -EPSILON, "vertex behind horizon: {p:?}");
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_intersection_lies_on_horizon_circle() {
        let a = DVec3::new(0.6, 0.0, 0.8);
        let b = DVec3::new(0.0, 0.6, -0.8);
        let p = horizon_intersection(a, b).unwrap();
        assert_eq!(p.z, 0.0);
        assert!((p.truncate().length() - 1.0).abs() < EPSILON);
        // Symmetric chord crosses at t = 0.5.
        assert!((p.x - p.y).abs() < EPSILON);
    }

    #[test]
    fn test_intersection_undefined_for_same_or_zero_sign() {
        let front = DVec3::new(0.0, 0.6, 0.8);
        let back = DVec3::new(0.0, 0.6, -0.8);
        assert!(horizon_intersection(front, front).is_none());
        assert!(horizon_intersection(DVec3::X, back).is_none());
        assert!(horizon_intersection(front, DVec3::X).is_none());
    }

    #[test]
    fn test_intersection_of_antipodal_chord_is_finite() {
        let a = DVec3::new(0.0, 0.0, 1.0);
        let b = DVec3::new(0.0, 0.0, -1.0);
        let p = horizon_intersection(a, b).unwrap();
        assert!(p.is_finite());
        assert_eq!(p, DVec3::X);
    }

    #[test]
    fn test_boundary_vertex_is_kept_without_duplicate() {
        let ring = [
            DVec3::new(0.0, 0.6, 0.8),
            DVec3::X,
            DVec3::new(0.0, -0.6, -0.8),
            DVec3::new(-0.6, 0.0, 0.8),
        ];
        let clipped = clip_ring(&ring);
        // front, boundary vertex, crossing on the (back -> front) edge, front.
        assert_eq!(clipped.len(), 4);
        assert_eq!(clipped[1], DVec3::X);
        assert_eq!(count_on_horizon(&clipped), 2);
    }

    #[test]
    fn test_disconnected_regions_stay_one_ring() {
        // A U-shape whose two arms poke over the horizon while the base is behind it.
        let ring = [
            DVec3::new(-0.6, 0.0, 0.8),
            DVec3::new(-0.6, 0.0, -0.8),
            DVec3::new(0.6, 0.0, -0.8),
            DVec3::new(0.6, 0.0, 0.8),
            DVec3::new(0.0, 0.0, -1.0),
        ];
        let clipped = clip_ring(&ring);
        assert_eq!(count_on_horizon(&clipped), 4);
        assert_eq!(clipped.len(), 6);
    }

    #[test]
    fn test_polyline_splits_into_visible_runs() {
        let line = [
            DVec3::new(-0.8, 0.0, 0.6),
            DVec3::new(-0.6, 0.0, -0.8),
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::new(0.6, 0.0, -0.8),
            DVec3::new(0.8, 0.0, 0.6),
            DVec3::new(0.6, 0.0, 0.8),
        ];
        let runs = clip_polyline(&line);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 2);
        assert_eq!(runs[0][1].z, 0.0);
        assert_eq!(runs[1].len(), 3);
        assert_eq!(runs[1][0].z, 0.0);
        for run in &runs {
            assert!(run.iter().all(|p| p.z >= 0.0));
        }
    }

    #[test]
    fn test_polyline_runs_index_shared_buffer() {
        let line = [
            DVec3::new(-0.8, 0.0, 0.6),
            DVec3::new(-0.6, 0.0, -0.8),
            DVec3::new(0.6, 0.0, -0.8),
            DVec3::new(0.8, 0.0, 0.6),
        ];
        let mut out = Vec::new();
        let mut runs = Vec::new();
        clip_polyline_into(&line, &mut out, &mut runs);
        assert_eq!(runs, vec![0..2, 2..4]);
        assert_eq!(out[runs[1].start].z, 0.0);

        let capacity = (out.capacity(), runs.capacity());
        clip_polyline_into(&line, &mut out, &mut runs);
        assert_eq!((out.capacity(), runs.capacity()), capacity);
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn test_polyline_fully_visible_is_single_run() {
        let line = [DVec3::new(0.0, 0.6, 0.8), DVec3::new(0.6, 0.0, 0.8)];
        let runs = clip_polyline(&line);
        assert_eq!(runs, vec![line.to_vec()]);
    }

    #[test]
    fn test_polyline_touching_horizon_once_is_dropped() {
        let line = [DVec3::new(0.0, 0.6, -0.8), DVec3::X, DVec3::new(0.0, -0.6, -0.8)];
        assert!(clip_polyline(&line).is_empty());
    }
}
