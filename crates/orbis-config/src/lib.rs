//! Settings for the orbis map pipeline.
//!
//! Settings persist as `config.ron` and can be overridden from the command
//! line. Missing sections and fields fall back to defaults, so older files
//! keep loading as new settings are added.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, CliProjection};
pub use config::{
    AnimationConfig, CONFIG_FILE, Config, DebugConfig, PipelineConfig, RenderConfig, ViewConfig,
    default_config_dir,
};
pub use error::ConfigError;
