//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use orbis_sphere::{
    DEFAULT_MAX_DEPTH, GeoCoordinate, MAX_DEPTH_LIMIT, ProjectionKind, ViewContext,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub view: ViewConfig,
    pub pipeline: PipelineConfig,
    pub render: RenderConfig,
    pub animation: AnimationConfig,
    pub debug: DebugConfig,
}

/// Where the map looks and how it is projected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    /// Longitude of the view centre in degrees.
    pub centre_lon_deg: f64,
    /// Latitude of the view centre in degrees.
    pub centre_lat_deg: f64,
    pub projection: ProjectionKind,
    /// Magnification; 1.0 fits the whole projected world.
    pub zoom: f32,
}

/// Subdivision and threading settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum projected deviation from the true great circle, in world units.
    pub tolerance: f64,
    /// Recursion cap for arc subdivision.
    pub max_depth: u32,
    /// Frame-building threads; 0 uses one per logical CPU.
    pub workers: usize,
}

/// Output surface and palette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// RGBA, linear.
    pub land_color: [f32; 4],
    pub ocean_color: [f32; 4],
    pub outline_color: [f32; 4],
}

/// Headless globe spin used by the demo driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Frames to build.
    pub frames: u32,
    /// Centre longitude change per frame, degrees.
    pub lon_step_deg: f64,
    /// Centre latitude change per frame, degrees.
    pub lat_step_deg: f64,
}

/// Development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g. "info", "debug,orbis_sphere=trace").
    pub log_level: String,
    /// Directory for the JSON log file in debug builds.
    pub log_dir: Option<PathBuf>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            centre_lon_deg: 0.0,
            centre_lat_deg: 20.0,
            projection: ProjectionKind::Orthographic,
            zoom: 1.0,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tolerance: ViewContext::DEFAULT_TOLERANCE,
            max_depth: DEFAULT_MAX_DEPTH,
            workers: 0,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            land_color: [0.36, 0.55, 0.32, 1.0],
            ocean_color: [0.07, 0.18, 0.36, 1.0],
            outline_color: [0.05, 0.05, 0.05, 1.0],
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames: 120,
            lon_step_deg: 3.0,
            lat_step_deg: 0.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Platform config directory for orbis, e.g. `~/.config/orbis` on Linux.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("orbis"))
        .ok_or(ConfigError::NoConfigDir)
}

impl Config {
    /// Pipeline context for the configured view.
    pub fn view_context(&self) -> ViewContext {
        let centre =
            GeoCoordinate::from_degrees(self.view.centre_lon_deg, self.view.centre_lat_deg);
        ViewContext::new(centre, self.view.projection, self.pipeline.tolerance)
            .with_max_depth(self.pipeline.max_depth)
    }

    /// Pull out-of-range values back into range, logging each fix.
    pub fn sanitize(&mut self) {
        let lat = self.view.centre_lat_deg;
        if !(-90.0..=90.0).contains(&lat) {
            let fixed = if lat.is_nan() { 0.0 } else { lat.clamp(-90.0, 90.0) };
            log::warn!("centre_lat_deg {lat} out of range, using {fixed}");
            self.view.centre_lat_deg = fixed;
        }
        if !self.view.centre_lon_deg.is_finite() {
            log::warn!("centre_lon_deg is not finite, using 0");
            self.view.centre_lon_deg = 0.0;
        }
        if !(self.view.zoom.is_finite() && self.view.zoom > 0.0) {
            log::warn!("zoom {} must be positive, using 1", self.view.zoom);
            self.view.zoom = 1.0;
        }
        if !(self.pipeline.tolerance.is_finite() && self.pipeline.tolerance > 0.0) {
            log::warn!(
                "tolerance {} must be positive, using {}",
                self.pipeline.tolerance,
                ViewContext::DEFAULT_TOLERANCE
            );
            self.pipeline.tolerance = ViewContext::DEFAULT_TOLERANCE;
        }
        if !(1..=MAX_DEPTH_LIMIT).contains(&self.pipeline.max_depth) {
            let fixed = self.pipeline.max_depth.clamp(1, MAX_DEPTH_LIMIT);
            log::warn!(
                "max_depth {} out of range, using {fixed}",
                self.pipeline.max_depth
            );
            self.pipeline.max_depth = fixed;
        }
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = read_config(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized)
            .map_err(ConfigError::WriteError)
    }

    /// Re-read the file: `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = read_config(&config_dir.join(CONFIG_FILE))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
    ron::from_str(&contents).map_err(ConfigError::ParseError)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_default_config_serializes() {
        let ron_str =
            ron::ser::to_string_pretty(&Config::default(), ron::ser::PrettyConfig::new()).unwrap();
        assert!(ron_str.contains("projection: Orthographic"));
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("log_level: \"info\""));
    }

    #[test]
    fn test_missing_section_uses_default() {
        let config: Config = ron::from_str("(view: (projection: Equirectangular))").unwrap();
        assert_eq!(config.view.projection, ProjectionKind::Equirectangular);
        assert!((config.view.centre_lat_deg - 20.0).abs() < EPSILON);
        assert_eq!(config.pipeline, PipelineConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(globe_texture: \"earth.png\")");
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("(view: (projection: Mercator))");
        assert!(result.is_err());
    }

    #[test]
    fn test_view_context_from_config() {
        let mut config = Config::default();
        config.view.centre_lon_deg = 45.0;
        config.view.centre_lat_deg = -30.0;
        config.pipeline.tolerance = 1e-4;
        config.pipeline.max_depth = 10;

        let ctx = config.view_context();
        assert!((ctx.centre.lon_degrees() - 45.0).abs() < EPSILON);
        assert!((ctx.centre.lat_degrees() + 30.0).abs() < EPSILON);
        assert!((ctx.tolerance - 1e-4).abs() < EPSILON);
        assert_eq!(ctx.max_depth, 10);
        assert_eq!(ctx.projection, ProjectionKind::Orthographic);
    }

    #[test]
    fn test_sanitize_fixes_bad_values() {
        let mut config = Config::default();
        config.view.centre_lat_deg = 120.0;
        config.view.centre_lon_deg = f64::NAN;
        config.view.zoom = 0.0;
        config.pipeline.tolerance = -1.0;
        config.pipeline.max_depth = 99;
        config.sanitize();

        assert!((config.view.centre_lat_deg - 90.0).abs() < EPSILON);
        assert_eq!(config.view.centre_lon_deg, 0.0);
        assert_eq!(config.view.zoom, 1.0);
        assert_eq!(config.pipeline.tolerance, ViewContext::DEFAULT_TOLERANCE);
        assert_eq!(config.pipeline.max_depth, MAX_DEPTH_LIMIT);

        let mut good = Config::default();
        good.sanitize();
        assert_eq!(good, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.view.projection = ProjectionKind::Equirectangular;
        config.pipeline.workers = 3;
        config.debug.log_dir = Some(PathBuf::from("/tmp/orbis-logs"));

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("orbis");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());

        let mut modified = config.clone();
        modified.view.zoom = 2.5;
        modified.save(dir.path()).unwrap();

        let reloaded = config.reload(dir.path()).unwrap().unwrap();
        assert_eq!(reloaded.view.zoom, 2.5);
    }

    #[test]
    fn test_reload_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "(view: [oops").unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
