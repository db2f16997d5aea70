//! Celestial bodies, their registry, and circular-orbit kinematics.

pub mod body;
pub mod clock;
pub mod orbit;
pub mod registry;

pub use body::{BodyDef, CelestialBody, SurfaceTextures, TextureHandle, default_bodies};
pub use clock::{MAX_FRAME_DELTA, SimulationClock};
pub use orbit::{model_transform, orbital_angle, orbital_position, spin_angle};
pub use registry::{BodyRegistry, RegistryError, seeded_rng};
