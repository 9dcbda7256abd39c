//! Headless orbis driver: loads a map, spins the globe and builds frames.

mod sample;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use orbis_config::{CliArgs, Config, RenderConfig, default_config_dir};
use orbis_geometry::{FeatureCollection, load_geojson_file};
use orbis_render::{
    FramePalette, FrameStats, Viewport, build_frame_parallel, resolve_workers,
};
use orbis_sphere::GeoCoordinate;
use tracing::{error, info, warn};

const SAMPLE_SEED: u64 = 0x0b15;
const SAMPLE_ISLANDS: usize = 48;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(|| default_config_dir().ok())
        .unwrap_or_else(|| PathBuf::from(".orbis"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config
        .debug
        .log_dir
        .clone()
        .unwrap_or_else(|| config_dir.join("logs"));
    orbis_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));
    config.sanitize();

    let collection = match args.input.as_deref() {
        Some(path) => match load_collection(path) {
            Some(collection) => collection,
            None => return ExitCode::FAILURE,
        },
        None => {
            info!("No input given, using the built-in sample world");
            sample::sample_world(SAMPLE_SEED, SAMPLE_ISLANDS)
        }
    };

    run(&collection, &config);
    ExitCode::SUCCESS
}

fn load_collection(path: &Path) -> Option<FeatureCollection> {
    match load_geojson_file(path) {
        Ok(report) => {
            if !report.is_clean() {
                warn!(
                    skipped = report.errors.len(),
                    "Some features in {} could not be loaded",
                    path.display()
                );
            }
            Some(report.collection)
        }
        Err(e) => {
            error!("Failed to load {}: {e}", path.display());
            None
        }
    }
}

/// Build `config.animation.frames` frames, moving the centre every frame.
fn run(collection: &FeatureCollection, config: &Config) {
    let mut ctx = config.view_context();
    let viewport = Viewport::new(config.render.width, config.render.height, config.view.zoom)
        .with_palette(palette(&config.render));
    let workers = resolve_workers(config.pipeline.workers);
    let frames = config.animation.frames;

    info!(
        features = collection.len(),
        projection = ctx.projection.label(),
        tolerance = ctx.tolerance,
        max_depth = ctx.max_depth,
        workers,
        frames,
        "Starting frame loop"
    );

    let start = Instant::now();
    let mut totals = FrameStats::default();
    let mut peak_segments = 0;
    for frame_index in 0..frames {
        ctx.recentre(centre_at(config, frame_index));
        let (frame, stats) = build_frame_parallel(collection, &ctx, &viewport, workers);
        peak_segments = peak_segments.max(frame.segment_count());
        totals.merge(&stats);

        info!(
            frame = frame_index,
            lon = ctx.centre.lon_degrees(),
            lat = ctx.centre.lat_degrees(),
            segments = frame.segment_count(),
            triangles = frame.triangle_count(),
            markers = frame.marker_count(),
            partial = stats.partial_rings,
            occluded = stats.occluded_rings,
            "Frame"
        );
    }

    let elapsed = start.elapsed();
    let per_frame_ms = if frames > 0 {
        elapsed.as_secs_f64() * 1000.0 / f64::from(frames)
    } else {
        0.0
    };
    info!(
        frames,
        rings = totals.rings,
        segments = totals.segments,
        triangles = totals.triangles,
        peak_segments,
        "Built {frames} frames in {:.1} ms ({per_frame_ms:.2} ms/frame)",
        elapsed.as_secs_f64() * 1000.0
    );
}

fn palette(render: &RenderConfig) -> FramePalette {
    FramePalette {
        land: render.land_color,
        ocean: render.ocean_color,
        outline: render.outline_color,
    }
}

fn centre_at(config: &Config, frame_index: u32) -> GeoCoordinate {
    let step = f64::from(frame_index);
    let lon = config.view.centre_lon_deg + config.animation.lon_step_deg * step;
    let lat = config.view.centre_lat_deg + config.animation.lat_step_deg * step;
    GeoCoordinate::from_degrees(lon, lat.clamp(-90.0, 90.0))
}
