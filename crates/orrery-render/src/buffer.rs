//! GPU vertex and index buffers for the shared sphere mesh.

use orrery_mesh::SphereMesh;
use wgpu::util::DeviceExt;

/// Vertex and index buffers ready to draw.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    /// Draw the first `count` indices. Clamped to the buffer's index count.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, count: u32) {
        render_pass.draw_indexed(0..count.min(self.index_count), 0, 0..1);
    }
}

/// Upload an interleaved copy of `mesh`. The mesh is read-only afterwards
/// and shared by every draw.
pub fn upload_sphere(device: &wgpu::Device, label: &str, mesh: &SphereMesh) -> MeshBuffer {
    let vertices = mesh.vertices();
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label}-vertices")),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label}-indices")),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    log::debug!(
        "Uploaded mesh '{label}': {} vertices, {} indices",
        vertices.len(),
        mesh.index_count()
    );
    MeshBuffer {
        vertex_buffer,
        index_buffer,
        index_count: mesh.index_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::test_device::create_test_device;
    use orrery_mesh::{SphereVertex, generate_sphere};

    #[test]
    fn test_upload_sizes_match_mesh() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let mesh = generate_sphere(1.0, 8).unwrap();
        let buffer = upload_sphere(&device, "test-sphere", &mesh);
        assert_eq!(buffer.index_count, 6 * 8 * 8);
        assert_eq!(
            buffer.vertex_buffer.size(),
            (81 * std::mem::size_of::<SphereVertex>()) as u64
        );
        assert_eq!(buffer.index_buffer.size(), (384 * 4) as u64);
    }
}
