//! Procedural sphere geometry shared by every body and the skybox.

pub mod sphere;
pub mod vertex;

pub use sphere::{MeshError, SphereMesh, generate_sphere};
pub use vertex::SphereVertex;
