//! Configuration sections, defaults, and RON persistence.

use std::path::{Path, PathBuf};

use orrery_space::BodyDef;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub render: RenderConfig,
    pub assets: AssetConfig,
    pub simulation: SimulationConfig,
    /// Replacement body table. `None` uses the built-in solar system.
    pub bodies: Option<Vec<BodyDef>>,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
    /// Present with `Fifo` when true, otherwise prefer `Mailbox`.
    pub vsync: bool,
    pub title: String,
}

/// Free-fly camera start pose and tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub start_position: [f32; 3],
    pub start_yaw_degrees: f32,
    pub start_pitch_degrees: f32,
    /// Radians of rotation per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    /// World units per second.
    pub base_speed: f32,
    /// Multiplier while the boost key is held.
    pub boost_factor: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Vertical field of view.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Latitude/longitude bands of the shared sphere mesh.
    pub sphere_bands: u32,
    /// Radius of the background sphere around the camera.
    pub skybox_radius: f32,
    /// Linear RGB.
    pub clear_color: [f64; 3],
}

/// Where textures are loaded from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding every texture file. Relative paths resolve against
    /// the working directory.
    pub texture_dir: PathBuf,
    /// Background star field, relative to `texture_dir`.
    pub skybox_texture: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulated seconds per real second.
    pub time_scale: f64,
    /// Fixed seed for phase offsets. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: [0.0, 0.0, 3000.0],
            start_yaw_degrees: -180.0,
            start_pitch_degrees: 0.0,
            mouse_sensitivity: 0.002,
            base_speed: 250.0,
            boost_factor: 4.0,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 1.0,
            far: 1_000_000.0,
            sphere_bands: 60,
            skybox_radius: 50_000.0,
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("textures"),
            skybox_texture: "8k_stars_milky_way.webp".to_string(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            seed: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Upper bound on `render.sphere_bands`; far beyond any visible gain and well
/// inside the mesh's 32-bit index range.
pub const MAX_SPHERE_BANDS: u32 = 1024;

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl Config {
    /// Load `config.ron` from `config_dir`, or write the defaults there if it
    /// does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);

        if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            let config: Config = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
            log::info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", path.display());
            Ok(config)
        }
    }

    /// Save as `config.ron` inside `config_dir`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_err)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        std::fs::write(&path, serialized).map_err(write_err)?;
        Ok(())
    }

    /// Range checks for values that would otherwise produce a degenerate
    /// projection, mesh, clock or camera. Body rows are checked when the
    /// registry is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.render;
        if !(1..=MAX_SPHERE_BANDS).contains(&r.sphere_bands) {
            return Err(invalid(
                "render.sphere_bands",
                format!("{} not in [1, {MAX_SPHERE_BANDS}]", r.sphere_bands),
            ));
        }
        if !(r.fov_degrees > 0.0 && r.fov_degrees < 180.0) {
            return Err(invalid("render.fov_degrees", format!("{} not in (0, 180)", r.fov_degrees)));
        }
        if !(r.near > 0.0 && r.far > r.near) {
            return Err(invalid(
                "render.far",
                format!("need 0 < near < far, got near={} far={}", r.near, r.far),
            ));
        }
        if !(r.skybox_radius > r.near && r.skybox_radius < r.far) {
            return Err(invalid(
                "render.skybox_radius",
                format!("{} must lie between near and far", r.skybox_radius),
            ));
        }
        let s = &self.simulation;
        if !(s.time_scale.is_finite() && s.time_scale >= 0.0) {
            return Err(invalid("simulation.time_scale", format!("{}", s.time_scale)));
        }
        let c = &self.camera;
        if !(c.base_speed.is_finite() && c.base_speed >= 0.0) {
            return Err(invalid("camera.base_speed", format!("{}", c.base_speed)));
        }
        if !(c.boost_factor.is_finite() && c.boost_factor > 0.0) {
            return Err(invalid("camera.boost_factor", format!("{}", c.boost_factor)));
        }
        if !(c.mouse_sensitivity.is_finite() && c.mouse_sensitivity > 0.0) {
            return Err(invalid(
                "camera.mouse_sensitivity",
                format!("{}", c.mouse_sensitivity),
            ));
        }
        if !c.start_position.iter().all(|v| v.is_finite()) {
            return Err(invalid("camera.start_position", format!("{:?}", c.start_position)));
        }
        if !c.start_yaw_degrees.is_finite() {
            return Err(invalid("camera.start_yaw_degrees", format!("{}", c.start_yaw_degrees)));
        }
        if !c.start_pitch_degrees.is_finite() {
            return Err(invalid(
                "camera.start_pitch_degrees",
                format!("{}", c.start_pitch_degrees),
            ));
        }
        Ok(())
    }

    /// Body table to build the registry from.
    pub fn body_defs(&self) -> Vec<BodyDef> {
        self.bodies
            .clone()
            .unwrap_or_else(orrery_space::default_bodies)
    }
}
