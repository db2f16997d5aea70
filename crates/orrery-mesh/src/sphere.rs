//! Latitude/longitude (UV) sphere generation.
//!
//! The mesh is built once at startup on the unit sphere and reused for every
//! draw: body size and placement come from the model transform, never from
//! the vertex data.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use thiserror::Error;

use crate::vertex::SphereVertex;

/// Errors returned when sphere parameters are rejected.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    /// At least one latitude and one longitude band is required.
    #[error("sphere band count must be at least 1, got {0}")]
    InvalidBandCount(u32),

    /// Radius must be a positive finite number.
    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    /// Vertex or index count would not fit the 32-bit index format.
    #[error("sphere band count {0} exceeds the 32-bit index range")]
    TooManyBands(u32),
}

/// A closed UV sphere with duplicated seam vertices.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    /// Vertex positions, `radius` away from the origin.
    pub positions: Vec<Vec3>,
    /// Outward unit normals, parallel to `positions`.
    pub normals: Vec<Vec3>,
    /// Texture coordinates, mirrored in both axes to match equirectangular maps.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
    band_count: u32,
}

impl SphereMesh {
    /// Number of latitude (and longitude) bands the mesh was built with.
    pub fn band_count(&self) -> u32 {
        self.band_count
    }

    /// Number of indices to pass to an indexed draw.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Interleave positions, normals and UVs for upload into a single vertex buffer.
    pub fn vertices(&self) -> Vec<SphereVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((position, normal), uv)| SphereVertex {
                position: position.to_array(),
                normal: normal.to_array(),
                uv: *uv,
            })
            .collect()
    }
}

/// Vertex and index counts for `band_count`, or `None` when either would not
/// fit in a `u32`.
fn mesh_counts(band_count: u32) -> Option<(u32, u32)> {
    let side = band_count.checked_add(1)?;
    let vertices = side.checked_mul(side)?;
    let indices = band_count.checked_mul(band_count)?.checked_mul(6)?;
    Some((vertices, indices))
}

/// Row-major vertex index of grid point `(lat, lon)`.
fn grid_index(lat: u32, lon: u32, band_count: u32) -> u32 {
    lat * (band_count + 1) + lon
}

/// Generate a UV sphere of the given radius.
///
/// `band_count` subdivides both latitude and longitude. The result holds
/// `(band_count + 1)²` vertices and `6 · band_count²` indices.
pub fn generate_sphere(radius: f32, band_count: u32) -> Result<SphereMesh, MeshError> {
    if band_count < 1 {
        return Err(MeshError::InvalidBandCount(band_count));
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(MeshError::InvalidRadius(radius));
    }

    let (vertex_count, index_count) =
        mesh_counts(band_count).ok_or(MeshError::TooManyBands(band_count))?;

    let bands = band_count as f32;
    let vertex_count = vertex_count as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for lat in 0..=band_count {
        let theta = lat as f32 * PI / bands;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for lon in 0..=band_count {
            let phi = lon as f32 * TAU / bands;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
            normals.push(normal);
            positions.push(normal * radius);
            uvs.push([1.0 - lon as f32 / bands, 1.0 - lat as f32 / bands]);
        }
    }

    let mut indices = Vec::with_capacity(index_count as usize);
    for lat in 0..band_count {
        for lon in 0..band_count {
            let first = grid_index(lat, lon, band_count);
            let second = grid_index(lat + 1, lon, band_count);
            indices.extend_from_slice(&[first, first + 1, second]);
            indices.extend_from_slice(&[second, first + 1, second + 1]);
        }
    }

    Ok(SphereMesh {
        positions,
        normals,
        uvs,
        indices,
        band_count,
    })
}
