//! Turns a geometry tree into frame buffers by running every leaf through
//! the sphere pipeline.

use std::ops::Range;

use glam::DVec2;
use orbis_geometry::{Feature, GeometryVisitor, RingRole};
use orbis_sphere::{
    GeoCoordinate, RingScratch, ViewContext, process_line_into, process_ring_into, project_point,
};

use crate::frame::{FrameGeometry, FrameStats};
use crate::vertex::{FillVertex, LineVertex, MarkerVertex};

/// Accumulates one frame's vertices for a fixed [`ViewContext`].
///
/// The builder owns its scratch arena and buffers, so keeping one builder per
/// worker across frames avoids steady-state allocation.
#[derive(Debug)]
pub struct FrameBuilder {
    ctx: ViewContext,
    scratch: RingScratch,
    outline: Vec<DVec2>,
    line_points: Vec<DVec2>,
    line_runs: Vec<Range<usize>>,
    frame: FrameGeometry,
    stats: FrameStats,
}

impl FrameBuilder {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scratch: RingScratch::new(),
            outline: Vec::new(),
            line_points: Vec::new(),
            line_runs: Vec::new(),
            frame: FrameGeometry::new(),
            stats: FrameStats::default(),
        }
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    /// Switch to a new view. Already accumulated vertices are kept.
    pub fn set_context(&mut self, ctx: ViewContext) {
        self.ctx = ctx;
    }

    /// Add one feature's geometry to the frame.
    pub fn add_feature(&mut self, feature: &Feature) {
        self.stats.features += 1;
        feature.geometry.accept(self);
    }

    pub fn frame(&self) -> &FrameGeometry {
        &self.frame
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Drop accumulated vertices and counters, keeping allocations.
    pub fn reset(&mut self) {
        self.frame.clear();
        self.stats = FrameStats::default();
        self.scratch.reset();
    }

    /// Hand out the accumulated frame and counters, leaving the builder empty.
    pub fn take(&mut self) -> (FrameGeometry, FrameStats) {
        (
            std::mem::take(&mut self.frame),
            std::mem::take(&mut self.stats),
        )
    }

    pub fn finish(mut self) -> (FrameGeometry, FrameStats) {
        self.take()
    }

    fn push_segment(&mut self, a: DVec2, b: DVec2) {
        self.frame.segments.push(LineVertex::new(a));
        self.frame.segments.push(LineVertex::new(b));
        self.stats.segments += 1;
    }
}

impl GeometryVisitor for FrameBuilder {
    fn visit_point(&mut self, point: GeoCoordinate) {
        self.stats.points += 1;
        match project_point(point, &self.ctx) {
            Some(p) => self.frame.markers.push(MarkerVertex::new(p)),
            None => self.stats.hidden_points += 1,
        }
    }

    fn visit_line(&mut self, line: &[GeoCoordinate]) {
        self.stats.lines += 1;
        let mut points = std::mem::take(&mut self.line_points);
        let mut runs = std::mem::take(&mut self.line_runs);
        process_line_into(line, &self.ctx, &mut self.scratch, &mut points, &mut runs);
        self.stats.line_runs += runs.len();
        for run in runs.iter().cloned() {
            for pair in points[run].windows(2) {
                self.push_segment(pair[0], pair[1]);
            }
        }
        self.line_points = points;
        self.line_runs = runs;
    }

    fn visit_ring(&mut self, ring: &[GeoCoordinate], role: RingRole) {
        if role == RingRole::Hole {
            self.stats.holes += 1;
        }
        let mut outline = std::mem::take(&mut self.outline);
        let class = process_ring_into(ring, &self.ctx, &mut self.scratch, &mut outline);
        self.stats.record_ring(class);

        let n = outline.len();
        if n >= 2 {
            for i in 0..n {
                self.push_segment(outline[i], outline[(i + 1) % n]);
            }
        }
        // Holes get the same fan; the even-odd stencil pass cancels them out.
        if n >= 3 {
            let origin = FillVertex::new(DVec2::ZERO);
            for i in 0..n {
                self.frame.fan.push(origin);
                self.frame.fan.push(FillVertex::new(outline[i]));
                self.frame.fan.push(FillVertex::new(outline[(i + 1) % n]));
            }
            self.stats.triangles += n;
        }
        self.outline = outline;
    }
}
