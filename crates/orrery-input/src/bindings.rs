//! Key bindings for free flight.

use winit::keyboard::KeyCode;

use crate::keyboard::KeyboardState;

/// Actions the flight camera reads from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightAction {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Boost,
}

/// Physical key assigned to each [`FlightAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightBindings {
    pub forward: KeyCode,
    pub back: KeyCode,
    pub strafe_left: KeyCode,
    pub strafe_right: KeyCode,
    pub boost: KeyCode,
}

impl Default for FlightBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            back: KeyCode::KeyS,
            strafe_left: KeyCode::KeyA,
            strafe_right: KeyCode::KeyD,
            boost: KeyCode::ShiftLeft,
        }
    }
}

impl FlightBindings {
    pub fn key_for(&self, action: FlightAction) -> KeyCode {
        match action {
            FlightAction::Forward => self.forward,
            FlightAction::Back => self.back,
            FlightAction::StrafeLeft => self.strafe_left,
            FlightAction::StrafeRight => self.strafe_right,
            FlightAction::Boost => self.boost,
        }
    }

    /// Whether the key bound to `action` is held.
    pub fn is_active(&self, keyboard: &KeyboardState, action: FlightAction) -> bool {
        keyboard.is_held(self.key_for(action))
    }
}
