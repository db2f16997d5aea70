//! First-person free-flight camera controller.

pub mod free_fly_camera;

pub use free_fly_camera::{
    CameraState, CaptureMode, FlightInput, FlightSettings, FreeFlyController, PITCH_LIMIT,
    forward_vector, look_direction, right_vector,
};
