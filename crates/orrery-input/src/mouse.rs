//! Pointer state: relative look motion, clicks, and cursor capture.
//!
//! While released the cursor behaves normally and motion is not reported as
//! look input. While captured the cursor is hidden and grabbed, and raw
//! `DeviceEvent::MouseMotion` deltas accumulate until the frame ends.

use glam::Vec2;
use tracing::{debug, warn};
use winit::event::{ElementState, MouseButton};
use winit::window::{CursorGrabMode, Window};

#[derive(Debug, Clone, Default)]
pub struct MouseState {
    look_delta: Vec2,
    left_clicked: bool,
    captured: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Event handlers ──────────────────────────────────────────────

    /// `DeviceEvent::MouseMotion`. Ignored unless captured.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.look_delta += Vec2::new(dx as f32, dy as f32);
        }
    }

    /// `WindowEvent::MouseInput`.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left && state == ElementState::Pressed {
            self.left_clicked = true;
        }
    }

    /// Grab and hide the cursor. Tries `Locked` first, then `Confined`.
    ///
    /// Returns whether the pointer is now captured.
    pub fn capture(&mut self, window: &Window) -> bool {
        if self.captured {
            return true;
        }
        let grabbed = window.set_cursor_grab(CursorGrabMode::Locked).is_ok()
            || window.set_cursor_grab(CursorGrabMode::Confined).is_ok();
        if !grabbed {
            warn!("Cursor grab refused by the platform; staying released");
            return false;
        }
        window.set_cursor_visible(false);
        self.captured = true;
        debug!("Pointer captured");
        true
    }

    /// Ungrab and show the cursor.
    pub fn release(&mut self, window: &Window) {
        if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            warn!("Failed to release cursor grab: {e}");
        }
        window.set_cursor_visible(true);
        self.mark_released();
    }

    /// Record that capture was lost without touching the window (focus
    /// change, compositor revoked the grab).
    pub fn mark_released(&mut self) {
        if self.captured {
            debug!("Pointer released");
        }
        self.captured = false;
        self.look_delta = Vec2::ZERO;
    }

    #[cfg(test)]
    pub(crate) fn set_captured_flag(&mut self, captured: bool) {
        self.captured = captured;
    }

    /// Reset per-frame accumulators.
    pub fn clear_transients(&mut self) {
        self.look_delta = Vec2::ZERO;
        self.left_clicked = false;
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Relative motion accumulated this frame while captured.
    #[must_use]
    pub fn look_delta(&self) -> Vec2 {
        self.look_delta
    }

    /// Whether the left button went down this frame.
    #[must_use]
    pub fn left_clicked(&self) -> bool {
        self.left_clicked
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_ignored_while_released() {
        let mut ms = MouseState::new();
        ms.on_raw_motion(15.0, -4.0);
        assert_eq!(ms.look_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_motion_accumulates_while_captured() {
        let mut ms = MouseState::new();
        ms.set_captured_flag(true);
        ms.on_raw_motion(3.0, 1.0);
        ms.on_raw_motion(2.0, -4.0);
        assert_eq!(ms.look_delta(), Vec2::new(5.0, -3.0));
    }

    #[test]
    fn test_clear_transients_resets_delta_and_click() {
        let mut ms = MouseState::new();
        ms.set_captured_flag(true);
        ms.on_raw_motion(3.0, 1.0);
        ms.on_button(MouseButton::Left, ElementState::Pressed);
        assert!(ms.left_clicked());
        ms.clear_transients();
        assert_eq!(ms.look_delta(), Vec2::ZERO);
        assert!(!ms.left_clicked());
        assert!(ms.is_captured(), "capture survives frame boundaries");
    }

    #[test]
    fn test_only_left_press_counts_as_click() {
        let mut ms = MouseState::new();
        ms.on_button(MouseButton::Right, ElementState::Pressed);
        ms.on_button(MouseButton::Left, ElementState::Released);
        assert!(!ms.left_clicked());
    }

    #[test]
    fn test_mark_released_drops_pending_delta() {
        let mut ms = MouseState::new();
        ms.set_captured_flag(true);
        ms.on_raw_motion(50.0, 50.0);
        ms.mark_released();
        assert!(!ms.is_captured());
        assert_eq!(ms.look_delta(), Vec2::ZERO);
    }
}
