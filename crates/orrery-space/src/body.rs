//! Celestial body descriptors and the built-in solar system table.

use serde::{Deserialize, Serialize};

/// One row of the body table, as written in the config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyDef {
    /// Unique identifier, also used to derive the default texture file name.
    pub name: String,
    /// Uniform scale applied to the unit sphere.
    pub diameter: f32,
    /// Orbit radius around the origin. Zero for the star.
    pub distance: f32,
    /// Simulated seconds per revolution. `None` for the star.
    #[serde(default)]
    pub orbital_period: Option<f32>,
    /// Simulated seconds per self-rotation. Larger is slower.
    pub spin_period: f32,
    /// The star sits at the origin and is drawn unlit.
    #[serde(default)]
    pub is_star: bool,
    /// Surface texture file name. Defaults to `2k_{name}.webp`.
    #[serde(default)]
    pub texture: Option<String>,
    /// Night-side texture file name, blended in on the unlit hemisphere.
    #[serde(default)]
    pub night_texture: Option<String>,
}

impl BodyDef {
    /// Orbiting body with the default texture naming.
    pub fn planet(
        name: &str,
        diameter: f32,
        distance: f32,
        orbital_period: f32,
        spin_period: f32,
    ) -> Self {
        Self {
            name: name.to_string(),
            diameter,
            distance,
            orbital_period: Some(orbital_period),
            spin_period,
            is_star: false,
            texture: None,
            night_texture: None,
        }
    }

    /// The star at the origin.
    pub fn star(name: &str, diameter: f32, spin_period: f32) -> Self {
        Self {
            name: name.to_string(),
            diameter,
            distance: 0.0,
            orbital_period: None,
            spin_period,
            is_star: true,
            texture: None,
            night_texture: None,
        }
    }

    /// Attach a night-side texture file.
    pub fn with_night_texture(mut self, file: &str) -> Self {
        self.night_texture = Some(file.to_string());
        self
    }

    /// File name of the primary surface texture.
    pub fn texture_file(&self) -> String {
        self.texture
            .clone()
            .unwrap_or_else(|| format!("2k_{}.webp", self.name))
    }
}

/// The built-in visualization set. Distances and diameters are compressed
/// for on-screen fit and do not preserve astronomical ratios.
pub fn default_bodies() -> Vec<BodyDef> {
    vec![
        BodyDef::star("sun", 1391.4, 720.0),
        BodyDef::planet("mercury", 4.879, 3000.0, 88.0, 4222.6),
        BodyDef::planet("venus", 12.104, 3750.0, 225.0, 2802.0),
        BodyDef::planet("earth", 12.756, 4500.0, 365.0, 24.0)
            .with_night_texture("2k_earth_nightmap.webp"),
        BodyDef::planet("mars", 6.792, 5250.0, 687.0, 24.7),
        BodyDef::planet("jupiter", 142.984, 6000.0, 4333.0, 9.9),
        BodyDef::planet("saturn", 120.536, 6750.0, 10759.0, 10.7),
        BodyDef::planet("uranus", 51.118, 7500.0, 30687.0, 17.2),
        BodyDef::planet("neptune", 49.528, 8250.0, 60190.0, 16.1),
        BodyDef::planet("pluto", 2.37, 9000.0, 90520.0, 153.3),
    ]
}

/// Opaque texture identifier issued by the rendering backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Textures owned by a body once assets are loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceTextures {
    pub primary: TextureHandle,
    pub night: Option<TextureHandle>,
}

/// A validated body plus its per-session state.
///
/// Built by [`BodyRegistry`](crate::BodyRegistry); the phase offset is fixed
/// at construction and the surface textures are attached once at startup.
#[derive(Clone, Debug)]
pub struct CelestialBody {
    def: BodyDef,
    phase_offset: f32,
    surface: Option<SurfaceTextures>,
}

impl CelestialBody {
    pub(crate) fn new(def: BodyDef, phase_offset: f32) -> Self {
        Self {
            def,
            phase_offset,
            surface: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn diameter(&self) -> f32 {
        self.def.diameter
    }

    pub fn distance(&self) -> f32 {
        self.def.distance
    }

    pub fn orbital_period(&self) -> Option<f32> {
        self.def.orbital_period
    }

    pub fn spin_period(&self) -> f32 {
        self.def.spin_period
    }

    pub fn is_star(&self) -> bool {
        self.def.is_star
    }

    /// Starting orbital angle in `[0, 2π)`.
    pub fn phase_offset(&self) -> f32 {
        self.phase_offset
    }

    /// The table row this body was built from.
    pub fn def(&self) -> &BodyDef {
        &self.def
    }

    pub fn surface(&self) -> Option<&SurfaceTextures> {
        self.surface.as_ref()
    }

    /// Attach the loaded textures. Replaces any previous attachment.
    pub fn attach_surface(&mut self, surface: SurfaceTextures) {
        self.surface = Some(surface);
    }
}
