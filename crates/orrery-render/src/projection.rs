//! Perspective projection with reverse-Z.

use glam::Mat4;

/// Vertical-FOV perspective. Depth is reversed: the near plane maps to 1.0
/// and the far plane to 0.0, which keeps precision across the 1..1e6 range
/// between a close planet and the skybox.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::from_degrees(60.0, 1.0, 1_000_000.0)
    }
}

impl Projection {
    pub fn from_degrees(fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y: fov_degrees.to_radians(),
            near,
            far,
        }
    }

    /// Projection matrix for a viewport of `width` x `height` pixels.
    /// A degenerate height is treated as 1 pixel.
    pub fn matrix(&self, width: u32, height: u32) -> Mat4 {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        // Swapping near and far yields the reversed depth range.
        Mat4::perspective_rh(self.fov_y, aspect, self.far, self.near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    fn ndc_depth(m: Mat4, z: f32) -> f32 {
        let clip = m * Vec4::new(0.0, 0.0, z, 1.0);
        clip.z / clip.w
    }

    #[test]
    fn test_near_maps_to_one_far_to_zero() {
        let p = Projection::default();
        let m = p.matrix(1280, 720);
        assert!((ndc_depth(m, -p.near) - 1.0).abs() < 1e-5);
        assert!(ndc_depth(m, -p.far).abs() < 1e-5);
    }

    #[test]
    fn test_closer_is_greater() {
        let m = Projection::default().matrix(800, 600);
        assert!(ndc_depth(m, -10.0) > ndc_depth(m, -5000.0));
    }

    #[test]
    fn test_aspect_follows_viewport() {
        let p = Projection::default();
        let wide = p.matrix(2000, 1000);
        let square = p.matrix(1000, 1000);
        // x scale shrinks as the viewport widens; y scale does not change.
        assert!((wide.x_axis.x * 2.0 - square.x_axis.x).abs() < 1e-5);
        assert!((wide.y_axis.y - square.y_axis.y).abs() < 1e-6);
    }

    #[test]
    fn test_zero_height_does_not_produce_nan() {
        let m = Projection::default().matrix(640, 0);
        let v = m.transform_point3(Vec3::new(1.0, 1.0, -10.0));
        assert!(v.is_finite());
    }

    #[test]
    fn test_sixty_degree_default() {
        let p = Projection::default();
        assert!((p.fov_y - std::f32::consts::FRAC_PI_3).abs() < 1e-6);
    }
}
