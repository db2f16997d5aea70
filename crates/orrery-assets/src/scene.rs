//! Loading every texture a scene needs before the first frame.

use std::path::{Path, PathBuf};

use orrery_space::BodyDef;
use tracing::info;

use crate::{AssetError, TextureImage, load_texture};

/// Decoded images for one body.
#[derive(Debug, Clone)]
pub struct BodyImages {
    pub name: String,
    pub primary: TextureImage,
    pub night: Option<TextureImage>,
}

/// All images for a scene: the star field and one entry per body, in table
/// order.
#[derive(Debug, Clone)]
pub struct SceneImages {
    pub skybox: TextureImage,
    pub bodies: Vec<BodyImages>,
}

fn resolve(dir: &Path, file: &str) -> PathBuf {
    dir.join(file)
}

/// Load the skybox and every body's textures from `texture_dir`.
///
/// Stops at the first failure; a scene with a missing texture is not drawn.
pub fn load_scene_images(
    texture_dir: &Path,
    skybox_file: &str,
    defs: &[BodyDef],
) -> Result<SceneImages, AssetError> {
    let skybox = load_texture(&resolve(texture_dir, skybox_file))?;

    let mut bodies = Vec::with_capacity(defs.len());
    for def in defs {
        let primary = load_texture(&resolve(texture_dir, &def.texture_file()))?;
        let night = def
            .night_texture
            .as_deref()
            .map(|file| load_texture(&resolve(texture_dir, file)))
            .transpose()?;
        bodies.push(BodyImages {
            name: def.name.clone(),
            primary,
            night,
        });
    }

    info!(
        dir = %texture_dir.display(),
        bodies = bodies.len(),
        "Loaded scene textures"
    );
    Ok(SceneImages { skybox, bodies })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_quad_png;

    #[test]
    fn test_loads_skybox_and_night_map() {
        let dir = tempfile::tempdir().unwrap();
        write_quad_png(dir.path(), "stars.png");
        write_quad_png(dir.path(), "2k_sun.webp");
        write_quad_png(dir.path(), "2k_earth.webp");
        write_quad_png(dir.path(), "night.png");

        let defs = vec![
            BodyDef::star("sun", 1400.0, 25.0),
            BodyDef::planet("earth", 12.756, 149.6, 365.0, 1.0).with_night_texture("night.png"),
        ];
        let scene = load_scene_images(dir.path(), "stars.png", &defs).unwrap();
        assert_eq!(scene.bodies.len(), 2);
        assert_eq!(scene.bodies[1].name, "earth");
        assert!(scene.bodies[0].night.is_none());
        assert!(scene.bodies[1].night.is_some());
    }

    #[test]
    fn test_missing_body_texture_names_file() {
        let dir = tempfile::tempdir().unwrap();
        write_quad_png(dir.path(), "stars.png");
        let defs = vec![BodyDef::star("sun", 1400.0, 25.0)];
        let err = load_scene_images(dir.path(), "stars.png", &defs).unwrap_err();
        assert!(err.path().ends_with("2k_sun.webp"), "got {}", err.path().display());
    }

    #[test]
    fn test_missing_skybox_fails_first() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_scene_images(dir.path(), "8k_stars_milky_way.webp", &[]).unwrap_err();
        assert!(err.path().ends_with("8k_stars_milky_way.webp"));
    }
}
