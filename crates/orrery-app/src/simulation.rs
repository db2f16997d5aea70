//! Simulation state owned by the application: clock, camera and bodies.

use glam::{Mat4, Vec3};
use orrery_config::Config;
use orrery_input::{FlightBindings, KeyboardState, MouseState};
use orrery_player::{CameraState, FlightSettings, FreeFlyController, PITCH_LIMIT};
use orrery_render::FrameInput;
use orrery_space::{BodyRegistry, RegistryError, SimulationClock, TextureHandle, seeded_rng};
use tracing::{debug, info};

/// Frames between camera position log lines at debug level.
const CAMERA_LOG_INTERVAL: u64 = 600;

pub struct Simulation {
    clock: SimulationClock,
    controller: FreeFlyController,
    bindings: FlightBindings,
    registry: BodyRegistry,
}

/// Camera start state and flight tunables from config.
pub fn controller_from_config(config: &Config) -> FreeFlyController {
    let camera = &config.camera;
    let state = CameraState {
        position: Vec3::from_array(camera.start_position),
        yaw: camera.start_yaw_degrees.to_radians(),
        pitch: camera
            .start_pitch_degrees
            .to_radians()
            .clamp(-PITCH_LIMIT, PITCH_LIMIT),
    };
    let settings = FlightSettings {
        mouse_sensitivity: camera.mouse_sensitivity,
        base_speed: camera.base_speed,
        boost_factor: camera.boost_factor,
    };
    FreeFlyController::new(state, settings)
}

impl Simulation {
    pub fn new(config: &Config, registry: BodyRegistry) -> Self {
        Self {
            clock: SimulationClock::new(config.simulation.time_scale),
            controller: controller_from_config(config),
            bindings: FlightBindings::default(),
            registry,
        }
    }

    /// Build the body registry from the configured table. Without a
    /// configured seed one is drawn at random and logged so the run can be
    /// repeated with `--seed`.
    ///
    /// # Errors
    ///
    /// Returns the first invalid row of the body table.
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        let seed = config.simulation.seed.unwrap_or_else(rand::random);
        info!(seed, "Seeding orbital phases");
        let registry = BodyRegistry::from_defs(config.body_defs(), &mut seeded_rng(seed))?;
        Ok(Self::new(config, registry))
    }

    /// Advance to `elapsed_seconds` of wall-clock time and apply this
    /// frame's input to the camera.
    pub fn step(&mut self, elapsed_seconds: f64, keyboard: &KeyboardState, mouse: &MouseState) {
        self.clock.advance_to(elapsed_seconds);
        self.controller
            .update(keyboard, &self.bindings, mouse, self.clock.delta());

        if self.clock.frame_count().is_multiple_of(CAMERA_LOG_INTERVAL) {
            debug!(
                frame = self.clock.frame_count(),
                sim_time = self.clock.sim_time(),
                camera = %self.controller.state(),
                "Simulation tick"
            );
        }
    }

    /// Everything the render sequencer needs for the current frame.
    pub fn frame_input(&self, viewport: (u32, u32), skybox: TextureHandle) -> FrameInput<'_> {
        FrameInput {
            viewport,
            view: self.view_matrix(),
            camera_position: self.controller.state().position,
            sim_time: self.clock.sim_time(),
            registry: &self.registry,
            skybox,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.controller.view_matrix()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn controller(&self) -> &FreeFlyController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut FreeFlyController {
        &mut self.controller
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    /// Used once at startup to attach textures.
    pub fn registry_mut(&mut self) -> &mut BodyRegistry {
        &mut self.registry
    }
}
