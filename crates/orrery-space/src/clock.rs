//! Simulation clock driven by the host frame callback.

/// Largest wall-clock step accepted in one frame (seconds).
///
/// Longer gaps (window dragged, debugger paused) are clamped so camera
/// movement does not jump.
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Monotonic simulated time plus the latest frame delta.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Simulated seconds since start (scaled).
    sim_time: f64,
    /// Wall-clock seconds covered by the latest frame, clamped.
    delta: f32,
    /// Wall-clock timestamp of the previous frame.
    last_wall: f64,
    /// Simulated seconds per wall-clock second.
    time_scale: f64,
    frame_count: u64,
}

impl SimulationClock {
    /// A clock that has not ticked yet.
    pub fn new(time_scale: f64) -> Self {
        Self {
            sim_time: 0.0,
            delta: 0.0,
            last_wall: 0.0,
            time_scale: time_scale.max(0.0),
            frame_count: 0,
        }
    }

    /// Advance to the wall-clock reading `elapsed_seconds` (seconds since
    /// start). Readings that go backwards produce a zero delta.
    pub fn advance_to(&mut self, elapsed_seconds: f64) {
        let raw = (elapsed_seconds - self.last_wall).max(0.0);
        let delta = raw.min(MAX_FRAME_DELTA as f64);
        self.last_wall = self.last_wall.max(elapsed_seconds);
        self.delta = delta as f32;
        self.sim_time += delta * self.time_scale;
        self.frame_count += 1;
    }

    /// Simulated time fed to orbital kinematics.
    pub fn sim_time(&self) -> f32 {
        self.sim_time as f32
    }

    /// Clamped wall-clock delta of the latest frame, fed to the camera.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Number of frames advanced so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_at_zero() {
        let clock = SimulationClock::default();
        assert_eq!(clock.sim_time(), 0.0);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.frame_count(), 0);
    }

    #[test]
    fn test_advance_accumulates_time() {
        let mut clock = SimulationClock::default();
        clock.advance_to(0.016);
        clock.advance_to(0.032);
        assert!((clock.delta() - 0.016).abs() < 1e-6);
        assert!((clock.sim_time() - 0.032).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_large_gap_is_clamped() {
        let mut clock = SimulationClock::default();
        clock.advance_to(0.1);
        clock.advance_to(5.0);
        assert_eq!(clock.delta(), MAX_FRAME_DELTA);
        assert!((clock.sim_time() - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_time_never_goes_backwards() {
        let mut clock = SimulationClock::default();
        clock.advance_to(1.0);
        let before = clock.sim_time();
        clock.advance_to(0.5);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.sim_time(), before);
        clock.advance_to(1.1);
        assert!((clock.delta() - 0.1).abs() < 1e-6, "delta measured from the latest reading");
    }

    #[test]
    fn test_time_scale_affects_sim_time_only() {
        let mut clock = SimulationClock::new(10.0);
        clock.advance_to(0.1);
        assert!((clock.delta() - 0.1).abs() < 1e-6);
        assert!((clock.sim_time() - 1.0).abs() < 1e-5);
    }
}
