//! Free-fly camera: mouse-look and WASD flight under pointer capture.
//!
//! The controller is a two-state machine. In [`CaptureMode::Released`] all
//! input is ignored so the pointer can be used normally. In
//! [`CaptureMode::Captured`] relative mouse motion steers yaw/pitch and the
//! movement keys translate the camera every frame.

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;

use glam::{Mat4, Vec2, Vec3};
use orrery_input::{FlightAction, FlightBindings, KeyboardState, MouseState};
use tracing::debug;

/// Pitch is kept strictly inside ±90° so the view basis never degenerates.
pub const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Position and orientation of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    /// Radians. `-π` faces the origin from the default position.
    pub yaw: f32,
    /// Radians, within `[-PITCH_LIMIT, PITCH_LIMIT]`.
    pub pitch: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3000.0),
            yaw: -PI,
            pitch: 0.0,
        }
    }
}

impl fmt::Display for CameraState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pos=({:.1}, {:.1}, {:.1}) yaw={:.1}° pitch={:.1}°",
            self.position.x,
            self.position.y,
            self.position.z,
            self.yaw.to_degrees(),
            self.pitch.to_degrees()
        )
    }
}

/// Pointer capture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
    #[default]
    Released,
    Captured,
}

/// Tunables for look and movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSettings {
    /// Radians per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    /// World units per second without boost.
    pub base_speed: f32,
    /// Speed multiplier while the boost key is held.
    pub boost_factor: f32,
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.002,
            base_speed: 250.0,
            boost_factor: 4.0,
        }
    }
}

/// Movement keys held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlightInput {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub boost: bool,
}

impl FlightInput {
    /// Sample held keys through `bindings`.
    pub fn from_keyboard(keyboard: &KeyboardState, bindings: &FlightBindings) -> Self {
        Self {
            forward: bindings.is_active(keyboard, FlightAction::Forward),
            back: bindings.is_active(keyboard, FlightAction::Back),
            strafe_left: bindings.is_active(keyboard, FlightAction::StrafeLeft),
            strafe_right: bindings.is_active(keyboard, FlightAction::StrafeRight),
            boost: bindings.is_active(keyboard, FlightAction::Boost),
        }
    }
}

/// Movement basis "forward" vector. Flying forward subtracts it.
pub fn forward_vector(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(
        yaw.sin() * pitch.cos(),
        -pitch.sin(),
        -yaw.cos() * pitch.cos(),
    )
}

/// Horizontal strafe vector.
pub fn right_vector(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, yaw.sin())
}

/// Unit direction the camera looks along.
pub fn look_direction(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(
        -yaw.sin() * pitch.cos(),
        pitch.sin(),
        yaw.cos() * pitch.cos(),
    )
}

/// Owns the [`CameraState`] and reacts to input.
#[derive(Debug, Clone, Default)]
pub struct FreeFlyController {
    state: CameraState,
    mode: CaptureMode,
    settings: FlightSettings,
}

impl FreeFlyController {
    pub fn new(state: CameraState, settings: FlightSettings) -> Self {
        Self {
            state,
            mode: CaptureMode::Released,
            settings,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn settings(&self) -> &FlightSettings {
        &self.settings
    }

    /// Released → Captured, after the host granted a pointer grab.
    pub fn request_capture(&mut self) {
        if self.mode == CaptureMode::Released {
            debug!("Camera captured at {}", self.state);
        }
        self.mode = CaptureMode::Captured;
    }

    /// Captured → Released, reported by the host.
    pub fn on_capture_lost(&mut self) {
        if self.mode == CaptureMode::Captured {
            debug!("Camera released at {}", self.state);
        }
        self.mode = CaptureMode::Released;
    }

    /// Follow the host's capture state.
    pub fn sync_capture(&mut self, captured: bool) {
        if captured {
            self.request_capture();
        } else {
            self.on_capture_lost();
        }
    }

    /// Apply one relative mouse sample. Y is inverted: moving the mouse up
    /// pitches up.
    pub fn look(&mut self, delta: Vec2) {
        if self.mode != CaptureMode::Captured {
            return;
        }
        self.state.yaw += delta.x * self.settings.mouse_sensitivity;
        self.state.pitch -= delta.y * self.settings.mouse_sensitivity;
        self.state.pitch = self.state.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Translate the camera for one frame of `dt` seconds. Held keys sum.
    pub fn fly(&mut self, input: &FlightInput, dt: f32) {
        if self.mode != CaptureMode::Captured {
            return;
        }
        let mut speed = self.settings.base_speed * dt;
        if input.boost {
            speed *= self.settings.boost_factor;
        }

        let forward = forward_vector(self.state.yaw, self.state.pitch);
        let right = right_vector(self.state.yaw);

        if input.forward {
            self.state.position -= forward * speed;
        }
        if input.back {
            self.state.position += forward * speed;
        }
        if input.strafe_left {
            self.state.position += right * speed;
        }
        if input.strafe_right {
            self.state.position -= right * speed;
        }
    }

    /// One frame of host input: capture sync, look, then movement.
    pub fn update(
        &mut self,
        keyboard: &KeyboardState,
        bindings: &FlightBindings,
        mouse: &MouseState,
        dt: f32,
    ) {
        self.sync_capture(mouse.is_captured());
        self.look(mouse.look_delta());
        self.fly(&FlightInput::from_keyboard(keyboard, bindings), dt);
    }

    /// Right-handed look-at view matrix with world up +Y.
    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.state.position;
        let target = eye + look_direction(self.state.yaw, self.state.pitch);
        Mat4::look_at_rh(eye, target, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured() -> FreeFlyController {
        let mut cam = FreeFlyController::default();
        cam.request_capture();
        cam
    }

    fn held(f: impl FnOnce(&mut FlightInput)) -> FlightInput {
        let mut input = FlightInput::default();
        f(&mut input);
        input
    }

    #[test]
    fn test_default_state_faces_origin() {
        let cam = FreeFlyController::default();
        assert_eq!(cam.mode(), CaptureMode::Released);
        assert_eq!(cam.state().position, Vec3::new(0.0, 0.0, 3000.0));
        let dir = look_direction(cam.state().yaw, cam.state().pitch);
        assert!((dir - Vec3::NEG_Z).length() < 1e-5, "looking along {dir}");
    }

    #[test]
    fn test_released_ignores_input() {
        let mut cam = FreeFlyController::default();
        let before = *cam.state();
        cam.look(Vec2::new(100.0, 100.0));
        cam.fly(&held(|i| i.forward = true), 1.0);
        assert_eq!(*cam.state(), before);
    }

    #[test]
    fn test_look_updates_yaw_and_inverted_pitch() {
        let mut cam = captured();
        cam.look(Vec2::new(10.0, 5.0));
        let s = cam.state();
        assert!((s.yaw - (-PI + 0.02)).abs() < 1e-6);
        assert!((s.pitch - (-0.01)).abs() < 1e-6);
    }

    #[test]
    fn test_pitch_clamped_under_extreme_input() {
        let mut cam = captured();
        cam.look(Vec2::new(0.0, -1.0e9));
        assert!(cam.state().pitch <= PITCH_LIMIT);
        assert!((cam.state().pitch - PITCH_LIMIT).abs() < 1e-6);

        for _ in 0..1000 {
            cam.look(Vec2::new(3.0, 750.0));
            assert!(cam.state().pitch.abs() <= PITCH_LIMIT);
        }
        assert!((cam.state().pitch + PITCH_LIMIT).abs() < 1e-6);
    }

    #[test]
    fn test_boost_is_exactly_four_times() {
        let mut plain = captured();
        let mut boosted = captured();
        let start = plain.state().position;

        plain.fly(&held(|i| i.forward = true), 0.1);
        boosted.fly(
            &held(|i| {
                i.forward = true;
                i.boost = true;
            }),
            0.1,
        );

        let d_plain = (plain.state().position - start).length();
        let d_boost = (boosted.state().position - start).length();
        assert!((d_plain - 25.0).abs() < 1e-3, "base step {d_plain}");
        assert!((d_boost / d_plain - 4.0).abs() < 1e-5, "ratio {}", d_boost / d_plain);
    }

    #[test]
    fn test_forward_moves_along_look_direction() {
        let mut cam = captured();
        cam.look(Vec2::new(-300.0, 120.0));
        let start = cam.state().position;
        let dir = look_direction(cam.state().yaw, cam.state().pitch);
        cam.fly(&held(|i| i.forward = true), 1.0);
        let moved = cam.state().position - start;
        assert!((moved - dir * 250.0).length() < 1e-2, "{moved} vs {dir}");
    }

    #[test]
    fn test_strafe_left_from_default_moves_negative_x() {
        let mut cam = captured();
        cam.fly(&held(|i| i.strafe_left = true), 1.0);
        let p = cam.state().position;
        assert!((p.x + 250.0).abs() < 1e-2, "x = {}", p.x);
        assert!((p.z - 3000.0).abs() < 1e-2);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut cam = captured();
        let start = cam.state().position;
        cam.fly(
            &held(|i| {
                i.forward = true;
                i.back = true;
                i.strafe_left = true;
                i.strafe_right = true;
            }),
            0.5,
        );
        assert!((cam.state().position - start).length() < 1e-3);
    }

    #[test]
    fn test_capture_lost_returns_to_released() {
        let mut cam = captured();
        cam.sync_capture(false);
        assert_eq!(cam.mode(), CaptureMode::Released);
        cam.sync_capture(true);
        assert_eq!(cam.mode(), CaptureMode::Captured);
    }

    #[test]
    fn test_view_matrix_places_target_ahead() {
        let mut cam = captured();
        cam.look(Vec2::new(200.0, -80.0));
        let view = cam.view_matrix();
        let s = cam.state();
        let eye = view.transform_point3(s.position);
        assert!(eye.length() < 1e-2, "eye maps to origin, got {eye}");
        let ahead = view.transform_point3(s.position + look_direction(s.yaw, s.pitch) * 10.0);
        assert!((ahead - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-2, "{ahead}");
    }

    #[test]
    fn test_view_matrix_finite_at_pitch_limit() {
        let mut cam = captured();
        cam.look(Vec2::new(0.0, -1.0e6));
        let view = cam.view_matrix();
        assert!(view.is_finite(), "view matrix degenerated at the pole");
    }

    #[test]
    fn test_custom_settings_respected() {
        let settings = FlightSettings {
            mouse_sensitivity: 0.01,
            base_speed: 100.0,
            boost_factor: 4.0,
        };
        let mut cam = FreeFlyController::new(CameraState::default(), settings);
        cam.request_capture();
        cam.fly(&held(|i| i.back = true), 1.0);
        assert!((cam.state().position.z - 3100.0).abs() < 1e-2);
    }
}
