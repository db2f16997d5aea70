//! Orrery application: platform directories, simulation state and the winit
//! event handler that drives the renderer.

pub mod error;
pub mod platform;
pub mod simulation;
pub mod window;

pub use error::StartupError;
pub use platform::{PlatformDirs, PlatformError};
pub use simulation::Simulation;
pub use window::{AppState, run_with_config, window_attributes_from_config};
