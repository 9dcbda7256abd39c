//! Whole-frame assembly, sequential or spread over worker threads.
//!
//! Each worker owns a [`FrameBuilder`] and processes contiguous batches of
//! features. Batches are gathered back in index order, so the parallel build
//! emits exactly the vertices of the sequential one.

use std::ops::Range;

use orbis_geometry::FeatureCollection;
use orbis_sphere::ViewContext;
use tracing::debug;

use crate::builder::FrameBuilder;
use crate::frame::{FrameGeometry, FrameStats};
use crate::viewport::{Viewport, view_projection};

/// Batches handed to each worker, on average.
const BATCHES_PER_WORKER: usize = 4;

/// Below this many features a parallel build is not worth the threads.
pub const MIN_PARALLEL_FEATURES: usize = 8;

/// Number of workers to use: `requested`, or one per logical CPU when 0.
pub fn resolve_workers(requested: usize) -> usize {
    if requested == 0 {
        num_cpus::get().max(1)
    } else {
        requested
    }
}

/// Build one frame on the calling thread.
pub fn build_frame(
    collection: &FeatureCollection,
    ctx: &ViewContext,
    viewport: &Viewport,
) -> (FrameGeometry, FrameStats) {
    let mut builder = FrameBuilder::new(*ctx);
    for feature in &collection.features {
        builder.add_feature(feature);
    }
    let (mut frame, stats) = builder.finish();
    frame.view_projection = view_projection(ctx.projection, viewport);
    frame.palette = viewport.palette;
    log_frame(&stats, 1);
    (frame, stats)
}

/// Build one frame with up to `workers` threads (0 means one per CPU).
///
/// Output is identical to [`build_frame`]. Small collections and a single
/// worker fall back to the sequential build.
pub fn build_frame_parallel(
    collection: &FeatureCollection,
    ctx: &ViewContext,
    viewport: &Viewport,
    workers: usize,
) -> (FrameGeometry, FrameStats) {
    let workers = resolve_workers(workers);
    let n = collection.len();
    if workers <= 1 || n < MIN_PARALLEL_FEATURES {
        return build_frame(collection, ctx, viewport);
    }

    let batch_size = n.div_ceil(workers * BATCHES_PER_WORKER).max(1);
    let batches: Vec<Range<usize>> = (0..n)
        .step_by(batch_size)
        .map(|start| start..(start + batch_size).min(n))
        .collect();
    let workers = workers.min(batches.len());

    let (task_tx, task_rx) = crossbeam_channel::unbounded::<(usize, Range<usize>)>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded();
    for (index, range) in batches.iter().cloned().enumerate() {
        // The receiver is alive until the end of this function.
        let _ = task_tx.send((index, range));
    }
    drop(task_tx);

    let mut parts: Vec<Option<(FrameGeometry, FrameStats)>> = vec![None; batches.len()];
    std::thread::scope(|scope| {
        for _ in 0..workers {
            let rx = task_rx.clone();
            let tx = result_tx.clone();
            scope.spawn(move || {
                let mut builder = FrameBuilder::new(*ctx);
                while let Ok((index, range)) = rx.recv() {
                    for feature in &collection.features[range] {
                        builder.add_feature(feature);
                    }
                    if tx.send((index, builder.take())).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        for (index, part) in result_rx.iter() {
            parts[index] = Some(part);
        }
    });

    let mut frame = FrameGeometry::new();
    let mut stats = FrameStats::default();
    for (mut part, part_stats) in parts.into_iter().flatten() {
        frame.append(&mut part);
        stats.merge(&part_stats);
    }
    frame.view_projection = view_projection(ctx.projection, viewport);
    frame.palette = viewport.palette;
    log_frame(&stats, workers);
    (frame, stats)
}

fn log_frame(stats: &FrameStats, workers: usize) {
    debug!(
        workers,
        features = stats.features,
        rings = stats.rings,
        partial = stats.partial_rings,
        occluded = stats.occluded_rings,
        segments = stats.segments,
        triangles = stats.triangles,
        "Frame built"
    );
}
