//! Pipeline for textured spheres: bodies and the skybox.
//!
//! Bind groups:
//! - 0: [`FrameUniform`] (view-projection, camera and light position)
//! - 1: [`DrawUniform`] (model matrix and per-draw flags)
//! - 2: primary texture + sampler
//! - 3: night texture + sampler
//!
//! Depth write and cull mode are fixed per pipeline in wgpu, so four
//! variants cover `{front, back} x {depth write on, off}`.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use orrery_mesh::SphereVertex;

use crate::backend::CullFace;
use crate::depth::DepthBuffer;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// The star; planets are lit from here.
    pub light_pos: [f32; 4],
}

impl FrameUniform {
    pub fn new(view: Mat4, projection: Mat4, camera_pos: Vec3, light_pos: Vec3) -> Self {
        Self {
            view_proj: (projection * view).to_cols_array_2d(),
            camera_pos: camera_pos.extend(1.0).to_array(),
            light_pos: light_pos.extend(1.0).to_array(),
        }
    }
}

impl Default for FrameUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO, Vec3::ZERO)
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    /// x: emissive, y: night blend, zw: unused.
    pub flags: [u32; 4],
}

impl DrawUniform {
    pub fn new(model: Mat4, emissive: bool, night_blend: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            flags: [emissive as u32, night_blend as u32, 0, 0],
        }
    }
}

pub struct BodyPipelines {
    variants: [wgpu::RenderPipeline; 4],
    pub frame_layout: wgpu::BindGroupLayout,
    pub draw_layout: wgpu::BindGroupLayout,
}

/// Slot of the pipeline variant for a cull face and depth-write setting.
pub fn variant_index(cull_face: CullFace, depth_write: bool) -> usize {
    let cull = match cull_face {
        CullFace::Back => 0,
        CullFace::Front => 2,
    };
    cull + usize::from(!depth_write)
}

fn uniform_layout(device: &wgpu::Device, label: &str, size: usize) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size as u64),
            },
            count: None,
        }],
    })
}

impl BodyPipelines {
    /// `texture_layout` is shared by groups 2 and 3.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("body-shader"),
            source: wgpu::ShaderSource::Wgsl(BODY_SHADER_SOURCE.into()),
        });
        let frame_layout =
            uniform_layout(device, "body-frame-layout", std::mem::size_of::<FrameUniform>());
        let draw_layout =
            uniform_layout(device, "body-draw-layout", std::mem::size_of::<DrawUniform>());

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("body-pipeline-layout"),
            bind_group_layouts: &[&frame_layout, &draw_layout, texture_layout, texture_layout],
            immediate_size: 0,
        });

        let build = |cull_face: CullFace, depth_write: bool| {
            let face = match cull_face {
                CullFace::Front => wgpu::Face::Front,
                CullFace::Back => wgpu::Face::Back,
            };
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&format!("body-pipeline-{face:?}-write-{depth_write}")),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[SphereVertex::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(face),
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(DepthBuffer::stencil_state(depth_write)),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview_mask: None,
                cache: None,
            })
        };

        // Order matches `variant_index`.
        let variants = [
            build(CullFace::Back, true),
            build(CullFace::Back, false),
            build(CullFace::Front, true),
            build(CullFace::Front, false),
        ];

        Self {
            variants,
            frame_layout,
            draw_layout,
        }
    }

    pub fn variant(&self, cull_face: CullFace, depth_write: bool) -> &wgpu::RenderPipeline {
        &self.variants[variant_index(cull_face, depth_write)]
    }
}

/// Lit, textured sphere shader.
///
/// Emissive draws return the primary texture unchanged. Lit draws use a
/// Lambert term toward the star plus a small ambient floor. With night blend
/// on, the night texture fades in across the terminator.
pub const BODY_SHADER_SOURCE: &str = r#"
struct FrameUniform {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    light_pos: vec4<f32>,
};

struct DrawUniform {
    model: mat4x4<f32>,
    flags: vec4<u32>,
};

@group(0) @binding(0) var<uniform> frame: FrameUniform;
@group(1) @binding(0) var<uniform> draw: DrawUniform;
@group(2) @binding(0) var day_texture: texture_2d<f32>;
@group(2) @binding(1) var day_sampler: sampler;
@group(3) @binding(0) var night_texture: texture_2d<f32>;
@group(3) @binding(1) var night_sampler: sampler;

const AMBIENT: f32 = 0.04;
const TERMINATOR_WIDTH: f32 = 0.15;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let world = draw.model * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * world;
    out.world_pos = world.xyz;
    // Scale is uniform, so the model matrix keeps normals perpendicular.
    out.world_normal = (draw.model * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let day = textureSample(day_texture, day_sampler, in.uv).rgb;
    let night = textureSample(night_texture, night_sampler, in.uv).rgb;

    if (draw.flags.x != 0u) {
        return vec4<f32>(day, 1.0);
    }

    let n = normalize(in.world_normal);
    let l = normalize(frame.light_pos.xyz - in.world_pos);
    let n_dot_l = dot(n, l);
    let lit = day * (AMBIENT + (1.0 - AMBIENT) * max(n_dot_l, 0.0));

    if (draw.flags.y != 0u) {
        let t = smoothstep(-TERMINATOR_WIDTH, TERMINATOR_WIDTH, n_dot_l);
        return vec4<f32>(mix(night, lit, t), 1.0);
    }
    return vec4<f32>(lit, 1.0);
}
"#;
