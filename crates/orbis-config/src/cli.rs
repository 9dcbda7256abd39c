//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use orbis_sphere::ProjectionKind;

use crate::Config;

/// Projection names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliProjection {
    Orthographic,
    Equirectangular,
}

impl From<CliProjection> for ProjectionKind {
    fn from(value: CliProjection) -> Self {
        match value {
            CliProjection::Orthographic => ProjectionKind::Orthographic,
            CliProjection::Equirectangular => ProjectionKind::Equirectangular,
        }
    }
}

/// orbis command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orbis", about = "Project and clip GeoJSON onto a globe")]
pub struct CliArgs {
    /// GeoJSON file to load (a built-in sample is used when absent).
    pub input: Option<PathBuf>,

    /// View centre longitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// View centre latitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    #[arg(long, value_enum)]
    pub projection: Option<CliProjection>,

    /// Maximum projected error of subdivided arcs.
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Subdivision depth cap.
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Frame-building threads (0 = one per CPU).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Number of frames to build.
    #[arg(long)]
    pub frames: Option<u32>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    #[arg(long)]
    pub zoom: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(lon) = args.lon {
            self.view.centre_lon_deg = lon;
        }
        if let Some(lat) = args.lat {
            self.view.centre_lat_deg = lat;
        }
        if let Some(projection) = args.projection {
            self.view.projection = projection.into();
        }
        if let Some(zoom) = args.zoom {
            self.view.zoom = zoom;
        }
        if let Some(tolerance) = args.tolerance {
            self.pipeline.tolerance = tolerance;
        }
        if let Some(max_depth) = args.max_depth {
            self.pipeline.max_depth = max_depth;
        }
        if let Some(workers) = args.workers {
            self.pipeline.workers = workers;
        }
        if let Some(frames) = args.frames {
            self.animation.frames = frames;
        }
        if let Some(w) = args.width {
            self.render.width = w;
        }
        if let Some(h) = args.height {
            self.render.height = h;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            lon: Some(-75.0),
            projection: Some(CliProjection::Equirectangular),
            workers: Some(4),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.view.centre_lon_deg, -75.0);
        assert_eq!(config.view.projection, ProjectionKind::Equirectangular);
        assert_eq!(config.pipeline.workers, 4);
        // Non-overridden fields retain defaults
        assert_eq!(config.view.centre_lat_deg, 20.0);
        assert_eq!(config.render.width, 1280);
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_arguments() {
        let args = CliArgs::parse_from([
            "orbis",
            "world.geojson",
            "--lon",
            "-120.5",
            "--lat",
            "-33",
            "--projection",
            "equirectangular",
            "--frames",
            "10",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("world.geojson")));
        assert_eq!(args.lon, Some(-120.5));
        assert_eq!(args.lat, Some(-33.0));
        assert_eq!(args.projection, Some(CliProjection::Equirectangular));
        assert_eq!(args.frames, Some(10));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_unknown_projection_rejected() {
        let result = CliArgs::try_parse_from(["orbis", "--projection", "mercator"]);
        assert!(result.is_err());
    }
}
