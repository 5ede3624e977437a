//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! particle-life scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – execution options (parallel step, frame rate, seed)
//! - [`WorldConfig`]      – canvas size in pixels and the virtual scale
//! - [`ParametersConfig`] – force radii (in pixels), strengths and friction
//! - [`ParticlesConfig`]  – population size, species count, initial velocity
//! - [`AttractionConfig`] – stock, random or explicit attraction matrix
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   parallel: true
//!   frame_rate: 60.0
//!   seed: 42                # omit to seed from entropy
//!
//! world:
//!   pixel_width: 800
//!   pixel_height: 600
//!   virtual_scale: 1        # world units per pixel
//!
//! parameters:
//!   rmin: 10.0              # pixels, multiplied by virtual_scale
//!   rmax: 300.0
//!   repel: 8.0
//!   max_attraction: 10.0
//!   friction: 0.5
//!   quantize_velocity: true
//!
//! particles:
//!   count: 500
//!   species_count: 2
//!   initial_velocity: zero  # or random_unit
//!
//! attraction:
//!   random: false
//!   matrix:                 # optional, species_count x species_count
//!     - [ 0.2,  0.2]
//!     - [-0.7, -0.2]
//! ```
//!
//! Every section is optional; missing values take the defaults shown by
//! the `Default` impls below.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SimError;
use crate::simulation::attraction::COEFFICIENT_BOUND;
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::projection::Projection;
use crate::simulation::species::Species;

/// Initial velocity given to particles at setup
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialVelocity {
    #[serde(rename = "zero")] // every particle starts at rest
    #[default]
    Zero,

    #[serde(rename = "random_unit")] // each component drawn from {-1, 0, 1}
    RandomUnit,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub parallel: bool,     // `true` - split force accumulation across threads
    pub frame_rate: f64,    // Ticks per second of the drive loop
    pub seed: Option<u64>,  // Deterministic seed, random when absent
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            frame_rate: 60.0,
            seed: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub pixel_width: u32,   // Logical canvas width handed to the rendering sink
    pub pixel_height: u32,  // Logical canvas height
    pub virtual_scale: u32, // World units per pixel
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            pixel_width: 800,
            pixel_height: 600,
            virtual_scale: 1,
        }
    }
}

/// Force and integration parameters; radii are given in pixels
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub rmin: f64,
    pub rmax: f64,
    pub repel: f64,
    pub max_attraction: f64,
    pub friction: f64,
    pub quantize_velocity: bool,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        let p = Parameters::default();
        Self {
            rmin: p.rmin,
            rmax: p.rmax,
            repel: p.repel,
            max_attraction: p.max_attraction,
            friction: p.friction,
            quantize_velocity: p.quantize_velocity,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParticlesConfig {
    pub count: usize,                     // Fixed store capacity
    pub species_count: usize,             // Uses the first K named species
    pub initial_velocity: InitialVelocity,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            count: 500,
            species_count: Species::COUNT,
            initial_velocity: InitialVelocity::Zero,
        }
    }
}

/// Starting attraction matrix
/// `matrix` wins over `random`; with neither the stock table is used
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AttractionConfig {
    pub random: bool,
    pub matrix: Option<Vec<Vec<f64>>>,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub world: WorldConfig,
    pub parameters: ParametersConfig,
    pub particles: ParticlesConfig,
    pub attraction: AttractionConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SimError> {
        let cfg: ScenarioConfig = serde_yaml::from_str(yaml)?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Reject anything that would make the first step meaningless
    pub fn validate(&self) -> Result<(), SimError> {
        let projection = self.projection()?;
        projection.world()?;

        self.engine().validate()?;

        self.parameters(&projection).validate()?;

        if self.particles.count == 0 {
            return Err(SimError::invalid("particles.count must be at least 1"));
        }
        if !(2..=Species::COUNT).contains(&self.particles.species_count) {
            return Err(SimError::invalid(format!(
                "particles.species_count must be in 2..={}, got {}",
                Species::COUNT,
                self.particles.species_count
            )));
        }

        if let Some(rows) = &self.attraction.matrix {
            if rows.len() != self.particles.species_count {
                return Err(SimError::invalid(format!(
                    "attraction.matrix has {} rows but species_count is {}",
                    rows.len(),
                    self.particles.species_count
                )));
            }
            if rows.iter().flatten().any(|v| !v.is_finite() || v.abs() > COEFFICIENT_BOUND) {
                return Err(SimError::invalid(format!(
                    "attraction.matrix entries must lie in [-{COEFFICIENT_BOUND}, {COEFFICIENT_BOUND}]"
                )));
            }
        }

        Ok(())
    }

    pub fn projection(&self) -> Result<Projection, SimError> {
        Projection::new(
            self.world.pixel_width,
            self.world.pixel_height,
            self.world.virtual_scale,
        )
    }

    /// Runtime parameters in world units
    pub fn parameters(&self, projection: &Projection) -> Parameters {
        let p = &self.parameters;
        Parameters {
            rmin: p.rmin * projection.scale(),
            rmax: p.rmax * projection.scale(),
            repel: p.repel,
            max_attraction: p.max_attraction,
            friction: p.friction,
            quantize_velocity: p.quantize_velocity,
        }
    }

    pub fn engine(&self) -> Engine {
        Engine {
            parallel: self.engine.parallel,
            frame_rate: self.engine.frame_rate,
            seed: self.engine.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = ScenarioConfig::from_yaml_str("{}").unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.world.pixel_width, 800);
        assert_eq!(cfg.particles.species_count, 6);
        assert_eq!(cfg.particles.initial_velocity, InitialVelocity::Zero);
        assert!(cfg.attraction.matrix.is_none());
    }

    #[test]
    fn parses_full_scenario() {
        let yaml = r#"
engine:
  parallel: false
  frame_rate: 30.0
  seed: 7
world:
  pixel_width: 1080
  pixel_height: 1080
  virtual_scale: 50
parameters:
  rmin: 10.0
  rmax: 200.0
  repel: 10.0
  max_attraction: 10.0
  friction: 0.2
  quantize_velocity: false
particles:
  count: 100
  species_count: 2
  initial_velocity: random_unit
attraction:
  matrix:
    - [ 0.2,  0.2]
    - [-0.7, -0.2]
"#;
        let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
        assert!(cfg.validate().is_ok());

        let proj = cfg.projection().unwrap();
        let params = cfg.parameters(&proj);
        assert_eq!(params.rmin, 500.0);
        assert_eq!(params.rmax, 10_000.0);
        assert!(!params.quantize_velocity);

        let engine = cfg.engine();
        assert!(!engine.parallel);
        assert_eq!(engine.seed, Some(7));
        assert_eq!(cfg.particles.initial_velocity, InitialVelocity::RandomUnit);
    }

    #[test]
    fn rejects_invalid_configurations() {
        let bad = [
            "world: { pixel_width: 0 }",
            "world: { virtual_scale: 0 }",
            "particles: { count: 0 }",
            "particles: { species_count: 1 }",
            "particles: { species_count: 7 }",
            "parameters: { rmin: 0.0 }",
            "parameters: { rmin: 50.0, rmax: 40.0 }",
            "parameters: { friction: 0.0 }",
            "engine: { frame_rate: 0.0 }",
            "particles: { species_count: 2 }\nattraction: { matrix: [[0.1, 0.1, 0.1]] }",
            "particles: { species_count: 2 }\nattraction: { matrix: [[2.0, 0.0], [0.0, 0.0]] }",
        ];
        for yaml in bad {
            let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
            assert!(
                matches!(cfg.validate(), Err(SimError::InvalidConfiguration(_))),
                "accepted: {yaml}"
            );
        }
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = ScenarioConfig::from_yaml_str("world: [1, 2").unwrap_err();
        assert!(matches!(err, SimError::Parse(_)));
    }
}
