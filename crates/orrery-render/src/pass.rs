//! Frame command encoding.
//!
//! [`FrameEncoder`] owns the acquired surface texture and the command
//! encoder for one frame; [`RenderPassBuilder`] describes the single color +
//! depth pass the orrery draws into.

use crate::depth::DepthBuffer;

/// Clear color and depth behaviour for the main pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    clear_depth: f32,
    label: &'static str,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    /// Black clear, reverse-Z depth clear.
    pub fn new() -> Self {
        Self {
            clear_color: wgpu::Color::BLACK,
            clear_depth: DepthBuffer::CLEAR_VALUE,
            label: "orrery-main-pass",
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Clear color from a linear RGB triple.
    pub fn clear_rgb(self, rgb: [f64; 3]) -> Self {
        self.clear_color(wgpu::Color {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            a: 1.0,
        })
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        color_view: &'e wgpu::TextureView,
        depth_view: &'e wgpu::TextureView,
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(self.label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_depth),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// One frame's encoder and swapchain image.
pub struct FrameEncoder {
    encoder: wgpu::CommandEncoder,
    surface_texture: wgpu::SurfaceTexture,
    surface_view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(device: &wgpu::Device, surface_texture: wgpu::SurfaceTexture) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            encoder,
            surface_texture,
            surface_view,
        }
    }

    /// Begin the main pass against the surface and `depth`.
    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &RenderPassBuilder,
        depth: &'a DepthBuffer,
    ) -> wgpu::RenderPass<'a> {
        builder.begin(&mut self.encoder, &self.surface_view, &depth.view)
    }

    /// Submit the frame's commands and present. Consumes the encoder so a
    /// frame is presented at most once.
    pub fn submit(self, queue: &wgpu::Queue) {
        queue.submit([self.encoder.finish()]);
        self.surface_texture.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clear_is_black() {
        let b = RenderPassBuilder::new();
        assert_eq!(b.clear_color, wgpu::Color::BLACK);
        assert_eq!(b.clear_depth, 0.0, "reverse-Z clears to the far plane");
    }

    #[test]
    fn test_clear_rgb_is_opaque() {
        let b = RenderPassBuilder::new().clear_rgb([0.1, 0.2, 0.3]);
        assert_eq!(b.clear_color.g, 0.2);
        assert_eq!(b.clear_color.a, 1.0);
    }

    #[test]
    fn test_label_is_stored() {
        assert_eq!(RenderPassBuilder::new().label("x").label, "x");
    }
}
