//! Configuration for the orrery viewer.
//!
//! Settings persist to disk as `config.ron` and can be overridden from the
//! command line. Every section defaults independently, so partial files and
//! files written by older versions load cleanly.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AssetConfig, CONFIG_FILE, CameraConfig, Config, DebugConfig, MAX_SPHERE_BANDS, RenderConfig,
    SimulationConfig,
    WindowConfig,
};
pub use error::ConfigError;
