//! Window size tracking in physical pixels.
//!
//! Wayland reports a 0x0 window before the compositor assigns a size and
//! minimizing on Windows does the same. Sizes are clamped to 1x1 so the
//! surface and depth buffer can always be configured.

/// Minimum surface dimension.
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// The drawable size changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceResizeEvent {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

#[derive(Debug, Clone)]
pub struct SurfaceWrapper {
    width: u32,
    height: u32,
    scale_factor: f64,
    /// Whether a non-zero size has been seen.
    configured: bool,
}

impl SurfaceWrapper {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            width: physical_width.max(MIN_SURFACE_DIMENSION),
            height: physical_height.max(MIN_SURFACE_DIMENSION),
            scale_factor,
            configured: physical_width > 0 && physical_height > 0,
        }
    }

    /// `WindowEvent::Resized`. Returns an event only when the clamped size
    /// actually changed.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let width = physical_width.max(MIN_SURFACE_DIMENSION);
        let height = physical_height.max(MIN_SURFACE_DIMENSION);
        if physical_width > 0 && physical_height > 0 {
            self.configured = true;
        }
        if width == self.width && height == self.height {
            return None;
        }
        self.width = width;
        self.height = height;
        Some(SurfaceResizeEvent {
            width,
            height,
            scale_factor: self.scale_factor,
        })
    }

    /// `WindowEvent::ScaleFactorChanged`; the new physical size follows in a
    /// `Resized` event on most platforms, so only the factor is stored.
    pub fn handle_scale_factor_changed(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// False until the window has reported a real (non-zero) size.
    pub fn is_configured(&self) -> bool {
        self.configured
    }
}
