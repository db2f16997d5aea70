//! Circular, coplanar orbit kinematics.
//!
//! Orbits lie on the XZ plane around the origin. Angles advance linearly with
//! simulated time: one revolution per `orbital_period` and one self-rotation
//! per `spin_period`, both measured in the same simulated seconds.

use std::f32::consts::TAU;

use glam::{Mat4, Vec3};

use crate::body::CelestialBody;

/// Orbital angle in radians, `2π · t / orbital_period + phase_offset`.
///
/// Returns `None` for the star, which does not orbit.
pub fn orbital_angle(body: &CelestialBody, sim_time: f32) -> Option<f32> {
    if body.is_star() {
        return None;
    }
    body.orbital_period()
        .map(|period| TAU * sim_time / period + body.phase_offset())
}

/// Self-rotation angle about the local Y axis, `2π · t / spin_period`.
///
/// No sign flip is applied for retrograde rotators.
pub fn spin_angle(body: &CelestialBody, sim_time: f32) -> f32 {
    TAU * sim_time / body.spin_period()
}

/// World-space centre of the body at `sim_time`.
pub fn orbital_position(body: &CelestialBody, sim_time: f32) -> Vec3 {
    match orbital_angle(body, sim_time) {
        Some(angle) => {
            let (sin, cos) = angle.sin_cos();
            Vec3::new(cos * body.distance(), 0.0, sin * body.distance())
        }
        None => Vec3::ZERO,
    }
}

/// Model matrix `Translate(position) · Scale(diameter) · RotateY(spin)`.
pub fn model_transform(body: &CelestialBody, sim_time: f32) -> Mat4 {
    Mat4::from_translation(orbital_position(body, sim_time))
        * Mat4::from_scale(Vec3::splat(body.diameter()))
        * Mat4::from_rotation_y(spin_angle(body, sim_time))
}
