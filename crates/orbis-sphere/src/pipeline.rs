//! Per-ring orchestration: sphere mapping, rotation, visibility, clipping,
//! subdivision and projection.
//!
//! Degenerate input never fails. Rings with too few points, fully occluded
//! rings and empty clip results all produce an empty polyline.

use std::ops::Range;

use glam::DVec2;
use tracing::trace;

use crate::clip::{clip_polyline_into, clip_ring_into};
use crate::context::ViewContext;
use crate::mapper::{GeoCoordinate, SpherePoint, geo_to_sphere, rotate_into};
use crate::subdivide::{Span, subdivide_polygon_into, subdivide_polyline_into};
use crate::visibility::{VisibilityClass, classify, is_visible};

/// Reusable buffers for the intermediate stages of one ring.
///
/// Each worker keeps one of these for the whole session. Buffers are cleared,
/// never shrunk, so steady-state frames do not allocate.
#[derive(Debug, Default)]
pub struct RingScratch {
    sphere: Vec<SpherePoint>,
    view: Vec<SpherePoint>,
    clipped: Vec<SpherePoint>,
    subdivided: Vec<SpherePoint>,
    spans: Vec<Span>,
    /// Visible runs of a clipped polyline, as ranges of `clipped`.
    runs: Vec<Range<usize>>,
}

impl RingScratch {
    /// Create an empty scratch arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all intermediate data, keeping allocations.
    pub fn reset(&mut self) {
        self.sphere.clear();
        self.view.clear();
        self.clipped.clear();
        self.subdivided.clear();
        self.spans.clear();
        self.runs.clear();
    }

    /// Number of points the scratch buffers can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.subdivided.capacity()
    }

    fn load(&mut self, ring: &[GeoCoordinate], ctx: &ViewContext) {
        self.sphere.clear();
        self.sphere.extend(ring.iter().map(|&c| geo_to_sphere(c)));
        rotate_into(&self.sphere, &ctx.rotation, &mut self.view);
    }
}

/// Run a closed ring through the whole pipeline and return its projected outline.
#[must_use]
pub fn process_ring(ring: &[GeoCoordinate], ctx: &ViewContext) -> Vec<DVec2> {
    let mut out = Vec::new();
    process_ring_into(ring, ctx, &mut RingScratch::new(), &mut out);
    out
}

/// Run a closed ring through the pipeline, writing the projected outline into `out`.
///
/// `out` is cleared first and left empty when nothing is drawable. The
/// returned class is [`VisibilityClass::Visible`] for projections without
/// occlusion.
pub fn process_ring_into(
    ring: &[GeoCoordinate],
    ctx: &ViewContext,
    scratch: &mut RingScratch,
    out: &mut Vec<DVec2>,
) -> VisibilityClass {
    out.clear();
    scratch.load(ring, ctx);

    let RingScratch {
        view,
        clipped,
        subdivided,
        spans,
        ..
    } = scratch;

    let class = if ctx.projection.has_occlusion() {
        classify(view)
    } else {
        VisibilityClass::Visible
    };
    let working: &[SpherePoint] = match class {
        VisibilityClass::Occluded => return class,
        VisibilityClass::Partial => {
            clip_ring_into(view, clipped);
            &clipped[..]
        }
        VisibilityClass::Visible => &view[..],
    };
    if working.len() < 2 {
        return class;
    }

    let capped = subdivide_polygon_into(working, ctx.subdivision(), spans, subdivided);
    if capped > 0 {
        trace!(capped, max_depth = ctx.max_depth, "ring subdivision hit depth cap");
    }
    if subdivided.len() < 2 {
        return class;
    }

    project_all(subdivided, ctx, out);
    if out.len() < 2 {
        out.clear();
    }
    class
}

/// Run an open polyline through the pipeline.
///
/// Lines are not closed, so clipping can split one line into several visible
/// runs. Each run is returned as its own projected polyline.
pub fn process_line(
    line: &[GeoCoordinate],
    ctx: &ViewContext,
    scratch: &mut RingScratch,
) -> Vec<Vec<DVec2>> {
    let mut points = Vec::new();
    let mut runs = Vec::new();
    process_line_into(line, ctx, scratch, &mut points, &mut runs);
    runs.into_iter().map(|run| points[run].to_vec()).collect()
}

/// Run an open polyline through the pipeline, writing every projected run
/// into `out` and its range of `out` into `runs`.
///
/// Both buffers are cleared first. Runs with fewer than two drawable points
/// are dropped.
pub fn process_line_into(
    line: &[GeoCoordinate],
    ctx: &ViewContext,
    scratch: &mut RingScratch,
    out: &mut Vec<DVec2>,
    runs: &mut Vec<Range<usize>>,
) {
    out.clear();
    runs.clear();
    scratch.load(line, ctx);

    let RingScratch {
        view,
        clipped,
        subdivided,
        spans,
        runs: visible,
        ..
    } = scratch;
    visible.clear();
    if view.len() < 2 {
        return;
    }

    let class = if ctx.projection.has_occlusion() {
        classify(view)
    } else {
        VisibilityClass::Visible
    };
    let source: &[SpherePoint] = match class {
        VisibilityClass::Occluded => return,
        VisibilityClass::Partial => {
            clip_polyline_into(view, clipped, visible);
            &clipped[..]
        }
        VisibilityClass::Visible => {
            visible.push(0..view.len());
            &view[..]
        }
    };

    let params = ctx.subdivision();
    for run in visible.iter() {
        subdivide_polyline_into(&source[run.clone()], params, spans, subdivided);
        let start = out.len();
        project_all(subdivided, ctx, out);
        if out.len() - start >= 2 {
            runs.push(start..out.len());
        } else {
            out.truncate(start);
        }
    }
}

/// Project a single geographic point, or `None` when it is behind the horizon.
pub fn project_point(coord: GeoCoordinate, ctx: &ViewContext) -> Option<DVec2> {
    let view = ctx.rotation * geo_to_sphere(coord);
    if ctx.projection.has_occlusion() && !is_visible(view) {
        return None;
    }
    let projected = ctx.projection.project(view);
    projected.is_finite().then_some(projected)
}

fn project_all(points: &[SpherePoint], ctx: &ViewContext, out: &mut Vec<DVec2>) {
    out.reserve(points.len());
    for &p in points {
        let projected = ctx.projection.project(p);
        if projected.is_finite() {
            out.push(projected);
        } else {
            trace!(?p, "dropping non-finite projected point");
        }
    }
}
