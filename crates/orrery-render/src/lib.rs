//! wgpu rendering for the orrery: GPU context, surface tracking, reverse-Z
//! depth, textures, the narrow [`RenderBackend`] seam, the per-frame
//! [`RenderSequencer`], and the wgpu implementation of the backend.

pub mod backend;
pub mod body_pipeline;
pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod projection;
pub mod sequencer;
pub mod surface;
pub mod texture;
pub mod wgpu_backend;

pub use backend::{CullFace, DrawState, RenderBackend, TextureUnit};
pub use body_pipeline::{BODY_SHADER_SOURCE, BodyPipelines, DrawUniform, FrameUniform};
pub use buffer::{MeshBuffer, upload_sphere};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use projection::Projection;
pub use sequencer::{FrameInput, RenderSequencer};
pub use surface::{SurfaceResizeEvent, SurfaceWrapper};
pub use texture::{GpuTextures, TextureError};
pub use wgpu_backend::{DrawCommand, DrawRecorder, WgpuBackend};
