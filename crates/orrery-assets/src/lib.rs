//! Texture loading for the orrery viewer.
//!
//! Images are decoded on the calling thread into tightly packed RGBA8 with
//! rows flipped so the first row in memory is the bottom of the picture.
//! The sphere mesh assigns `v = 1` to the north pole, so with this order
//! `v = 1` samples the top of the source image.

mod scene;

pub use scene::{BodyImages, SceneImages, load_scene_images};

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

/// A texture failed to load. Every variant is fatal at startup.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The file could not be read.
    #[error("failed to read texture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a supported image.
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image decoded to zero pixels.
    #[error("texture {path} has no pixels ({width}x{height})")]
    Empty {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

impl AssetError {
    /// Path of the file that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Decode { path, .. } | Self::Empty { path, .. } => path,
        }
    }
}

/// Decoded RGBA8 pixels, bottom row first.
#[derive(Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for TextureImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

impl TextureImage {
    /// Bytes per row of the RGBA8 data.
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

/// Read and decode an image file. The format is sniffed from the content,
/// falling back to the extension.
#[instrument(level = "debug", fields(path = %path.display()))]
pub fn load_texture(path: &Path) -> Result<TextureImage, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decode(path, &bytes)?;
    debug!(
        width = image.width,
        height = image.height,
        "Decoded texture"
    );
    Ok(image)
}

fn decode(path: &Path, bytes: &[u8]) -> Result<TextureImage, AssetError> {
    let decode_err = |source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let format = image::guess_format(bytes)
        .or_else(|e| image::ImageFormat::from_path(path).map_err(|_| e))
        .map_err(decode_err)?;
    let decoded = image::load_from_memory_with_format(bytes, format).map_err(decode_err)?;

    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(AssetError::Empty {
            path: path.to_path_buf(),
            width,
            height,
        });
    }

    let rgba = image::imageops::flip_vertical(&decoded.to_rgba8()).into_raw();
    Ok(TextureImage {
        width,
        height,
        rgba,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_quad_png;

    #[test]
    fn test_load_png_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_quad_png(dir.path(), "quad.png");
        let tex = load_texture(&path).unwrap();
        assert_eq!((tex.width, tex.height), (2, 2));
        assert_eq!(tex.rgba.len(), 16);
        assert_eq!(tex.bytes_per_row(), 8);
    }

    #[test]
    fn test_rows_are_flipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_quad_png(dir.path(), "quad.png");
        let tex = load_texture(&path).unwrap();
        // First row in memory is the bottom of the source: blue, white.
        assert_eq!(&tex.rgba[0..4], &[0, 0, 255, 255], "bottom-left first");
        assert_eq!(&tex.rgba[4..8], &[255, 255, 255, 255]);
        assert_eq!(&tex.rgba[8..12], &[255, 0, 0, 255], "top-left last row");
    }

    #[test]
    fn test_format_sniffed_despite_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_quad_png(dir.path(), "quad.png");
        let renamed = dir.path().join("2k_mars.webp");
        std::fs::rename(&path, &renamed).unwrap();
        assert!(load_texture(&renamed).is_ok());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2k_nowhere.webp");
        let err = load_texture(&path).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert_eq!(err.path(), path.as_path());
        assert!(err.to_string().contains("2k_nowhere.webp"));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        let err = load_texture(&path).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }), "got {err:?}");
    }

    #[test]
    fn test_debug_omits_pixel_bytes() {
        let tex = TextureImage {
            width: 1,
            height: 1,
            rgba: vec![1, 2, 3, 4],
        };
        let s = format!("{tex:?}");
        assert!(s.contains("bytes: 4"));
    }
}
