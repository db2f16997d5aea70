//! Body registry: validation, phase assignment, and lookup.

use std::collections::HashMap;
use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::body::{BodyDef, CelestialBody};

/// Configuration errors detected while building the registry.
///
/// Every variant describes a table that would otherwise divide by zero or
/// produce NaN transforms at render time.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistryError {
    #[error("body table is empty")]
    Empty,

    #[error("body '{0}' appears more than once")]
    DuplicateName(String),

    #[error("body table must contain exactly one star, found {0}")]
    StarCount(usize),

    #[error("body '{name}' has invalid spin period {value}")]
    InvalidSpinPeriod { name: String, value: f32 },

    #[error("body '{name}' has invalid orbital period {value:?}")]
    InvalidOrbitalPeriod { name: String, value: Option<f32> },

    #[error("body '{name}' has invalid orbital distance {value}")]
    InvalidDistance { name: String, value: f32 },

    #[error("body '{name}' has invalid diameter {value}")]
    InvalidDiameter { name: String, value: f32 },
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Check a single table row.
pub fn validate_def(def: &BodyDef) -> Result<(), RegistryError> {
    let name = || def.name.clone();

    if !positive(def.spin_period) {
        return Err(RegistryError::InvalidSpinPeriod {
            name: name(),
            value: def.spin_period,
        });
    }
    if !positive(def.diameter) {
        return Err(RegistryError::InvalidDiameter {
            name: name(),
            value: def.diameter,
        });
    }

    if def.is_star {
        if def.distance != 0.0 {
            return Err(RegistryError::InvalidDistance {
                name: name(),
                value: def.distance,
            });
        }
        return Ok(());
    }

    if !def.orbital_period.is_some_and(positive) {
        return Err(RegistryError::InvalidOrbitalPeriod {
            name: name(),
            value: def.orbital_period,
        });
    }
    if !positive(def.distance) {
        return Err(RegistryError::InvalidDistance {
            name: name(),
            value: def.distance,
        });
    }
    Ok(())
}

/// Deterministic RNG for phase offsets.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Ordered, validated set of bodies. Registry order is draw order.
#[derive(Clone, Debug)]
pub struct BodyRegistry {
    bodies: Vec<CelestialBody>,
    name_index: HashMap<String, usize>,
    star_index: usize,
}

impl BodyRegistry {
    /// Validate `defs` and build the registry, drawing one phase offset per
    /// body uniformly from `[0, 2π)`.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] found. Nothing is constructed on
    /// failure.
    pub fn from_defs<R: Rng + ?Sized>(
        defs: Vec<BodyDef>,
        rng: &mut R,
    ) -> Result<Self, RegistryError> {
        if defs.is_empty() {
            return Err(RegistryError::Empty);
        }

        let stars = defs.iter().filter(|d| d.is_star).count();
        if stars != 1 {
            return Err(RegistryError::StarCount(stars));
        }

        let mut name_index = HashMap::with_capacity(defs.len());
        for (idx, def) in defs.iter().enumerate() {
            validate_def(def)?;
            if name_index.insert(def.name.clone(), idx).is_some() {
                return Err(RegistryError::DuplicateName(def.name.clone()));
            }
        }

        let star_index = defs.iter().position(|d| d.is_star).unwrap_or_default();
        let bodies: Vec<_> = defs
            .into_iter()
            .map(|def| {
                let phase = rng.random_range(0.0..TAU);
                CelestialBody::new(def, phase)
            })
            .collect();

        log::debug!("Registered {} bodies", bodies.len());

        Ok(Self {
            bodies,
            name_index,
            star_index,
        })
    }

    /// Look up a body by name.
    pub fn get_by_name(&self, name: &str) -> Option<&CelestialBody> {
        self.name_index.get(name).map(|&idx| &self.bodies[idx])
    }

    /// The single star.
    pub fn star(&self) -> &CelestialBody {
        &self.bodies[self.star_index]
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Always false for a successfully built registry.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate bodies in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    /// Mutable iteration, used once at startup to attach textures.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CelestialBody> {
        self.bodies.iter_mut()
    }
}
