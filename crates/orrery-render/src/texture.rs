//! GPU textures for body surfaces and the skybox.
//!
//! Every uploaded image gets a full mip chain (generated on the GPU with a
//! blit pass) and a ready-made bind group. Handles are indices into the
//! store and stay valid for the life of the [`GpuTextures`].

use orrery_assets::TextureImage;
use orrery_space::TextureHandle;

/// sRGB because planet and star maps are authored as color images.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture '{label}' data is {actual} bytes, expected {expected} for {width}x{height}")]
    DataSizeMismatch {
        label: String,
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("texture '{label}' has zero size ({width}x{height})")]
    ZeroDimensions {
        label: String,
        width: u32,
        height: u32,
    },

    /// Larger than the device's `max_texture_dimension_2d`.
    #[error("texture '{label}' is {width}x{height}, device limit is {max}")]
    TooLarge {
        label: String,
        width: u32,
        height: u32,
        max: u32,
    },
}

struct GpuTexture {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Number of mip levels down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

const BLIT_SHADER_SOURCE: &str = r#"
@group(0) @binding(0) var src_texture: texture_2d<f32>;
@group(0) @binding(1) var src_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: VertexOutput;
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(src_texture, src_sampler, in.uv);
}
"#;

pub struct GpuTextures {
    textures: Vec<GpuTexture>,
    sampler: wgpu::Sampler,
    bind_group_layout: wgpu::BindGroupLayout,
    blit_pipeline: wgpu::RenderPipeline,
    blit_sampler: wgpu::Sampler,
    max_dimension: u32,
}

impl GpuTextures {
    pub fn new(device: &wgpu::Device) -> Self {
        // Longitude wraps; latitude stops at the poles.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("surface-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            anisotropy_clamp: 4,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("surface-texture-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let blit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mip-blit-shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_SHADER_SOURCE.into()),
        });
        let blit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mip-blit-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });
        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mip-blit-pipeline"),
            layout: Some(&blit_layout),
            vertex: wgpu::VertexState {
                module: &blit_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &blit_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TEXTURE_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });
        let blit_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("mip-blit-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            textures: Vec::new(),
            sampler,
            bind_group_layout,
            blit_pipeline,
            blit_sampler,
            max_dimension: device.limits().max_texture_dimension_2d,
        }
    }

    /// Layout shared by every texture bind group (texture at 0, sampler at 1).
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Upload `image` with a generated mip chain.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &TextureImage,
    ) -> Result<TextureHandle, TextureError> {
        let (width, height) = (image.width, image.height);
        validate(label, image, self.max_dimension)?;

        let mip_levels = mip_level_count(width, height);
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.bytes_per_row()),
                rows_per_image: Some(height),
            },
            size,
        );

        if mip_levels > 1 {
            self.generate_mipmaps(device, queue, &texture, mip_levels);
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.make_bind_group(device, &format!("{label}-bind-group"), &view, &self.sampler);

        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(GpuTexture {
            texture,
            bind_group,
        });
        log::info!("Uploaded texture '{label}' ({width}x{height}, {mip_levels} mips) as {handle:?}");
        Ok(handle)
    }

    pub fn bind_group(&self, handle: TextureHandle) -> Option<&wgpu::BindGroup> {
        self.textures.get(handle.0 as usize).map(|t| &t.bind_group)
    }

    fn make_bind_group(
        &self,
        device: &wgpu::Device,
        label: &str,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn generate_mipmaps(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
        mip_levels: u32,
    ) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("mip-encoder"),
        });

        for level in 1..mip_levels {
            let src_view = texture.create_view(&wgpu::TextureViewDescriptor {
                base_mip_level: level - 1,
                mip_level_count: Some(1),
                ..Default::default()
            });
            let dst_view = texture.create_view(&wgpu::TextureViewDescriptor {
                base_mip_level: level,
                mip_level_count: Some(1),
                ..Default::default()
            });
            let bind_group = self.make_bind_group(device, "mip-blit-bind-group", &src_view, &self.blit_sampler);

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mip-blit-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &dst_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            pass.set_pipeline(&self.blit_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        queue.submit([encoder.finish()]);
    }
}

fn validate(label: &str, image: &TextureImage, max_dimension: u32) -> Result<(), TextureError> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions {
            label: label.to_string(),
            width,
            height,
        });
    }
    if width > max_dimension || height > max_dimension {
        return Err(TextureError::TooLarge {
            label: label.to_string(),
            width,
            height,
            max: max_dimension,
        });
    }
    let expected = width as usize * height as usize * 4;
    if image.rgba.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            label: label.to_string(),
            actual: image.rgba.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::test_device::create_test_device;

    fn image(width: u32, height: u32) -> TextureImage {
        TextureImage {
            width,
            height,
            rgba: vec![128; (width * height * 4) as usize],
        }
    }

    #[test]
    fn test_mip_level_count() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2048, 1024), 12);
        assert_eq!(mip_level_count(8192, 4096), 14);
        assert_eq!(mip_level_count(3, 1), 2);
    }

    #[test]
    fn test_validate_rejects_short_data() {
        let mut img = image(4, 4);
        img.rgba.truncate(10);
        assert!(matches!(
            validate("mars", &img, 8192),
            Err(TextureError::DataSizeMismatch { expected: 64, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_oversized() {
        let img = TextureImage {
            width: 16384,
            height: 1,
            rgba: Vec::new(),
        };
        assert!(matches!(
            validate("stars", &img, 8192),
            Err(TextureError::TooLarge { max: 8192, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(matches!(
            validate("void", &image(0, 4), 8192),
            Err(TextureError::ZeroDimensions { .. })
        ));
    }

    #[test]
    fn test_handles_are_sequential() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let mut textures = GpuTextures::new(&device);
        let a = textures.upload(&device, &queue, "a", &image(4, 4)).unwrap();
        let b = textures.upload(&device, &queue, "b", &image(8, 2)).unwrap();
        assert_eq!(a, TextureHandle(0));
        assert_eq!(b, TextureHandle(1));
        assert!(textures.bind_group(b).is_some());
        assert!(textures.bind_group(TextureHandle(2)).is_none());
    }
}
