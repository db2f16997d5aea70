//! Frame-coherent keyboard and pointer state fed by winit events.

pub mod bindings;
pub mod keyboard;
pub mod mouse;

pub use bindings::{FlightAction, FlightBindings};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
