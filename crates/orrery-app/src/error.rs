use std::io;

use orrery_assets::AssetError;
use orrery_mesh::MeshError;
use orrery_render::{RenderContextError, TextureError};
use orrery_space::RegistryError;
use thiserror::Error;

/// Anything that stops the orrery before or while entering the render loop.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    Render(#[from] RenderContextError),

    #[error("invalid body table: {0}")]
    Registry(#[from] RegistryError),

    #[error("failed to build sphere mesh: {0}")]
    Mesh(#[from] MeshError),

    #[error("failed to load texture: {0}")]
    Asset(#[from] AssetError),

    #[error("failed to upload texture: {0}")]
    Texture(#[from] TextureError),
}

impl StartupError {
    /// Write a plain-text report for the terminal, independent of the log
    /// filter. Texture failures name the file and how to point at another
    /// texture directory.
    pub fn write_report(&self, out: &mut impl io::Write) -> io::Result<()> {
        writeln!(out, "Orrery could not start: {self}")?;
        if let Self::Asset(err) = self {
            writeln!(
                out,
                "Missing or unreadable texture: {}. Set `assets.texture_dir` in config.ron or pass --textures <dir>.",
                err.path().display()
            )?;
        }
        Ok(())
    }
}
