//! The narrow interface the frame sequencer drives.
//!
//! A backend is a small state machine: setters change the current draw
//! state and [`RenderBackend::draw_indexed`] issues the shared sphere mesh
//! with whatever state is current. [`DrawState`] is that state as a value so
//! implementations can snapshot it per draw.

use glam::Mat4;
use orrery_space::TextureHandle;

/// Which triangle faces are discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CullFace {
    /// Discard front faces; used to see the inside of the skybox.
    Front,
    #[default]
    Back,
}

/// Texture slots a draw can sample from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureUnit {
    /// Albedo, or the day side of a body with a night map.
    Primary,
    /// Night-side emission, blended across the terminator.
    Night,
}

pub trait RenderBackend {
    /// Match the drawable area to the window, in physical pixels.
    fn resize_viewport(&mut self, width: u32, height: u32);

    /// Camera transforms for every following draw in the frame.
    fn set_view_projection(&mut self, view: Mat4, projection: Mat4);

    fn set_depth_write(&mut self, enabled: bool);

    fn set_cull_face(&mut self, face: CullFace);

    fn set_model(&mut self, model: Mat4);

    /// Emissive draws ignore lighting (the star and the skybox).
    fn set_emissive(&mut self, emissive: bool);

    fn bind_texture(&mut self, unit: TextureUnit, texture: TextureHandle);

    /// Blend the primary and night textures by how much the surface faces
    /// the star. When off only the primary texture is sampled.
    fn set_night_blend(&mut self, enabled: bool);

    /// Draw `index_count` indices of the shared mesh with the current state.
    fn draw_indexed(&mut self, index_count: u32);
}

/// Backend state that applies to a single draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawState {
    pub depth_write: bool,
    pub cull_face: CullFace,
    pub model: Mat4,
    pub emissive: bool,
    pub primary: Option<TextureHandle>,
    pub night: Option<TextureHandle>,
    pub night_blend: bool,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            depth_write: true,
            cull_face: CullFace::Back,
            model: Mat4::IDENTITY,
            emissive: false,
            primary: None,
            night: None,
            night_blend: false,
        }
    }
}

impl DrawState {
    pub fn bind(&mut self, unit: TextureUnit, texture: TextureHandle) {
        match unit {
            TextureUnit::Primary => self.primary = Some(texture),
            TextureUnit::Night => self.night = Some(texture),
        }
    }

    /// Texture sampled for the night side: the night map when blending is
    /// on and one is bound, otherwise the primary texture.
    pub fn effective_night(&self) -> Option<TextureHandle> {
        if self.night_blend {
            self.night.or(self.primary)
        } else {
            self.primary
        }
    }
}
