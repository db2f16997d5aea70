//! [`RenderBackend`] on top of wgpu.
//!
//! wgpu has no mutable global pipeline state, so setter calls are folded
//! into a [`DrawState`] and each `draw_indexed` snapshots it into a
//! [`DrawCommand`]. [`WgpuBackend::flush`] then replays the list into one
//! render pass, choosing the pipeline variant per command and giving every
//! draw its own uniform slot.

use glam::{Mat4, Vec3};
use orrery_assets::TextureImage;
use orrery_mesh::SphereMesh;
use orrery_space::TextureHandle;

use crate::backend::{CullFace, DrawState, RenderBackend, TextureUnit};
use crate::body_pipeline::{BodyPipelines, DrawUniform, FrameUniform};
use crate::buffer::{MeshBuffer, upload_sphere};
use crate::depth::DepthBuffer;
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::texture::{GpuTextures, TextureError};

/// Planets are lit from the star at the origin.
const LIGHT_POSITION: Vec3 = Vec3::ZERO;

/// One recorded draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub state: DrawState,
    pub index_count: u32,
}

/// GPU-independent half of the backend: the current state and the draws
/// recorded this frame.
#[derive(Debug, Clone, Default)]
pub struct DrawRecorder {
    state: DrawState,
    commands: Vec<DrawCommand>,
    frame: Option<FrameUniform>,
    pending_resize: Option<(u32, u32)>,
}

impl DrawRecorder {
    /// Drop last frame's draws and return to the default state.
    pub fn reset(&mut self) {
        self.state = DrawState::default();
        self.commands.clear();
        self.frame = None;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn frame_uniform(&self) -> Option<&FrameUniform> {
        self.frame.as_ref()
    }

    fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.pending_resize.take()
    }
}

impl RenderBackend for DrawRecorder {
    fn resize_viewport(&mut self, width: u32, height: u32) {
        self.pending_resize = Some((width, height));
    }

    fn set_view_projection(&mut self, view: Mat4, projection: Mat4) {
        let camera = view.inverse().w_axis.truncate();
        self.frame = Some(FrameUniform::new(view, projection, camera, LIGHT_POSITION));
    }

    fn set_depth_write(&mut self, enabled: bool) {
        self.state.depth_write = enabled;
    }

    fn set_cull_face(&mut self, face: CullFace) {
        self.state.cull_face = face;
    }

    fn set_model(&mut self, model: Mat4) {
        self.state.model = model;
    }

    fn set_emissive(&mut self, emissive: bool) {
        self.state.emissive = emissive;
    }

    fn bind_texture(&mut self, unit: TextureUnit, texture: TextureHandle) {
        self.state.bind(unit, texture);
    }

    fn set_night_blend(&mut self, enabled: bool) {
        self.state.night_blend = enabled;
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.commands.push(DrawCommand {
            state: self.state,
            index_count,
        });
    }
}

struct DrawSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct WgpuBackend {
    recorder: DrawRecorder,
    pipelines: BodyPipelines,
    textures: GpuTextures,
    mesh: MeshBuffer,
    depth: DepthBuffer,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    slots: Vec<DrawSlot>,
    pass: RenderPassBuilder,
}

impl WgpuBackend {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        size: (u32, u32),
        mesh: &SphereMesh,
        clear_rgb: [f64; 3],
    ) -> Self {
        let textures = GpuTextures::new(device);
        let pipelines = BodyPipelines::new(device, surface_format, textures.bind_group_layout());
        let mesh = upload_sphere(device, "body-sphere", mesh);
        let depth = DepthBuffer::new(device, size.0, size.1);

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-uniform"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bind-group"),
            layout: &pipelines.frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        Self {
            recorder: DrawRecorder::default(),
            pipelines,
            textures,
            mesh,
            depth,
            frame_buffer,
            frame_bind_group,
            slots: Vec::new(),
            pass: RenderPassBuilder::new().clear_rgb(clear_rgb),
        }
    }

    pub fn upload_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &TextureImage,
    ) -> Result<TextureHandle, TextureError> {
        self.textures.upload(device, queue, label, image)
    }

    /// Index count of the shared sphere.
    pub fn index_count(&self) -> u32 {
        self.mesh.index_count
    }

    /// Start recording a new frame.
    pub fn begin_frame(&mut self) {
        self.recorder.reset();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        self.recorder.commands()
    }

    fn ensure_slots(&mut self, device: &wgpu::Device, count: usize) {
        while self.slots.len() < count {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("draw-uniform-{}", self.slots.len())),
                size: std::mem::size_of::<DrawUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("draw-bind-group"),
                layout: &self.pipelines.draw_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.slots.push(DrawSlot { buffer, bind_group });
        }
    }

    /// Replay the recorded draws into `frame`'s render pass.
    pub fn flush(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frame: &mut FrameEncoder) {
        if let Some((width, height)) = self.recorder.take_resize()
            && self.depth.resize(device, width, height)
        {
            log::debug!("Depth buffer resized to {width}x{height}");
        }

        let frame_uniform = self.recorder.frame_uniform().copied().unwrap_or_default();
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame_uniform));

        let count = self.recorder.commands().len();
        self.ensure_slots(device, count);
        for (slot, cmd) in self.slots.iter().zip(self.recorder.commands()) {
            let uniform = DrawUniform::new(cmd.state.model, cmd.state.emissive, cmd.state.night_blend);
            queue.write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&uniform));
        }

        let mut pass = frame.begin_render_pass(&self.pass, &self.depth);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        self.mesh.bind(&mut pass);

        for (slot, cmd) in self.slots.iter().zip(self.recorder.commands()) {
            let state = &cmd.state;
            let primary = state.primary.and_then(|h| self.textures.bind_group(h));
            let night = state.effective_night().and_then(|h| self.textures.bind_group(h));
            let (Some(primary), Some(night)) = (primary, night) else {
                log::warn!("Skipping draw with unbound or unknown texture: {state:?}");
                continue;
            };
            pass.set_pipeline(self.pipelines.variant(state.cull_face, state.depth_write));
            pass.set_bind_group(1, &slot.bind_group, &[]);
            pass.set_bind_group(2, primary, &[]);
            pass.set_bind_group(3, night, &[]);
            self.mesh.draw(&mut pass, cmd.index_count);
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn resize_viewport(&mut self, width: u32, height: u32) {
        self.recorder.resize_viewport(width, height);
    }

    fn set_view_projection(&mut self, view: Mat4, projection: Mat4) {
        self.recorder.set_view_projection(view, projection);
    }

    fn set_depth_write(&mut self, enabled: bool) {
        self.recorder.set_depth_write(enabled);
    }

    fn set_cull_face(&mut self, face: CullFace) {
        self.recorder.set_cull_face(face);
    }

    fn set_model(&mut self, model: Mat4) {
        self.recorder.set_model(model);
    }

    fn set_emissive(&mut self, emissive: bool) {
        self.recorder.set_emissive(emissive);
    }

    fn bind_texture(&mut self, unit: TextureUnit, texture: TextureHandle) {
        self.recorder.bind_texture(unit, texture);
    }

    fn set_night_blend(&mut self, enabled: bool) {
        self.recorder.set_night_blend(enabled);
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.recorder.draw_indexed(index_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_snapshots_current_state() {
        let mut rec = DrawRecorder::default();
        rec.set_depth_write(false);
        rec.set_cull_face(CullFace::Front);
        rec.bind_texture(TextureUnit::Primary, TextureHandle(4));
        rec.draw_indexed(96);
        rec.set_depth_write(true);
        rec.set_cull_face(CullFace::Back);
        rec.draw_indexed(96);

        let cmds = rec.commands();
        assert_eq!(cmds.len(), 2);
        assert!(!cmds[0].state.depth_write);
        assert_eq!(cmds[0].state.cull_face, CullFace::Front);
        assert!(cmds[1].state.depth_write, "later changes do not rewrite earlier draws");
        assert_eq!(cmds[1].state.primary, Some(TextureHandle(4)));
    }

    #[test]
    fn test_reset_clears_commands_and_state() {
        let mut rec = DrawRecorder::default();
        rec.set_emissive(true);
        rec.draw_indexed(6);
        rec.reset();
        assert!(rec.commands().is_empty());
        rec.draw_indexed(6);
        assert!(!rec.commands()[0].state.emissive);
    }

    #[test]
    fn test_resize_is_taken_once() {
        let mut rec = DrawRecorder::default();
        rec.resize_viewport(640, 480);
        assert_eq!(rec.take_resize(), Some((640, 480)));
        assert_eq!(rec.take_resize(), None);
    }

    #[test]
    fn test_frame_uniform_recovers_camera_position() {
        let mut rec = DrawRecorder::default();
        let eye = Vec3::new(5.0, -2.0, 3000.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        rec.set_view_projection(view, Mat4::IDENTITY);
        let u = rec.frame_uniform().unwrap();
        let cam = Vec3::new(u.camera_pos[0], u.camera_pos[1], u.camera_pos[2]);
        assert!((cam - eye).length() < 1e-2, "camera at {cam}");
        assert_eq!(u.light_pos, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_sequencer_drives_recorder() {
        use crate::projection::Projection;
        use crate::sequencer::{FrameInput, RenderSequencer};
        use orrery_space::{BodyRegistry, SurfaceTextures, default_bodies, seeded_rng};

        let mut registry = BodyRegistry::from_defs(default_bodies(), &mut seeded_rng(3)).unwrap();
        for (i, body) in registry.iter_mut().enumerate() {
            body.attach_surface(SurfaceTextures {
                primary: TextureHandle(i as u32 + 1),
                night: None,
            });
        }
        let mut seq = RenderSequencer::new(Projection::default(), 96, 50_000.0);
        let mut rec = DrawRecorder::default();
        seq.render_frame(
            &mut rec,
            &FrameInput {
                viewport: (800, 600),
                view: Mat4::IDENTITY,
                camera_position: Vec3::ZERO,
                sim_time: 0.0,
                registry: &registry,
                skybox: TextureHandle(0),
            },
        );
        assert_eq!(rec.commands().len(), registry.len() + 1);
        assert_eq!(rec.commands()[0].state.primary, Some(TextureHandle(0)));
        assert_eq!(rec.take_resize(), Some((800, 600)));
    }
}
