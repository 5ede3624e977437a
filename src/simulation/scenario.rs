//! Build a fully-initialized simulation from configuration
//!
//! `Simulation` is the single owned aggregate behind every frontend: it
//! holds the engine settings, parameters, particle store, attraction matrix
//! and the random source used for setup and reseeding. Frontends talk to it
//! between ticks only, through `step`, `apply` and `snapshot`.
//!
//! With the `viewer` feature it is inserted into Bevy as a `Resource`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::attraction::AttractionMatrix;
use super::engine::Engine;
use super::forces::ForceLaw;
use super::integrator::euler_step;
use super::params::Parameters;
use super::projection::Projection;
use super::species::Species;
use super::states::{NVec2, Particle, ParticleStore};
use crate::configuration::config::ScenarioConfig;
use crate::driver::{Command, Flow};
use crate::error::SimError;

#[cfg_attr(feature = "viewer", derive(bevy::prelude::Resource))]
pub struct Simulation {
    pub engine: Engine,
    parameters: Parameters,
    law: ForceLaw,
    projection: Projection,
    store: ParticleStore,
    matrix: AttractionMatrix,
    species_count: usize,
    rng: StdRng,
    tick: u64,
}

impl Simulation {
    pub fn build(cfg: &ScenarioConfig) -> Result<Self, SimError> {
        cfg.validate()?;

        let engine = cfg.engine();
        let projection = cfg.projection()?;
        let world = projection.world()?;
        let parameters = cfg.parameters(&projection);
        let species_count = cfg.particles.species_count;

        let mut rng = match engine.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let store = ParticleStore::setup(
            world,
            cfg.particles.count,
            species_count,
            cfg.particles.initial_velocity,
            &mut rng,
        )?;

        // Explicit rows win, then a random draw, then the stock table
        let matrix = match (&cfg.attraction.matrix, cfg.attraction.random) {
            (Some(rows), _) => AttractionMatrix::from_rows(rows)?,
            (None, true) => AttractionMatrix::random(species_count, &mut rng),
            (None, false) => AttractionMatrix::standard(species_count),
        };

        info!(
            particles = store.capacity(),
            species = species_count,
            world_width = world.width(),
            world_height = world.height(),
            parallel = engine.parallel,
            "built simulation"
        );

        Self::new(engine, parameters, projection, store, matrix, rng)
    }

    /// Assemble from parts, e.g. a hand-placed store in tests
    pub fn new(
        engine: Engine,
        parameters: Parameters,
        projection: Projection,
        store: ParticleStore,
        matrix: AttractionMatrix,
        rng: StdRng,
    ) -> Result<Self, SimError> {
        engine.validate()?;
        parameters.validate()?;
        let species_count = matrix.size();
        Ok(Self {
            law: ForceLaw::from_parameters(&parameters),
            engine,
            parameters,
            projection,
            store,
            matrix,
            species_count,
            rng,
            tick: 0,
        })
    }

    /// Advance exactly one step
    pub fn step(&mut self) {
        euler_step(
            &mut self.store,
            &self.law,
            &self.matrix,
            &self.parameters,
            self.engine.parallel,
        );
        self.tick += 1;
    }

    /// Apply one input event; only ever called between steps
    pub fn apply(&mut self, command: Command) -> Flow {
        match command {
            Command::Spawn {
                pixel_x,
                pixel_y,
                species,
            } => {
                self.spawn_at_pixel(pixel_x, pixel_y, species);
                Flow::Continue
            }
            Command::Reseed => {
                self.reseed();
                Flow::Continue
            }
            Command::Terminate => {
                info!(tick = self.tick, "terminate requested");
                Flow::Terminate
            }
        }
    }

    /// Spawn at a world position, evicting the oldest ring slot
    /// Non-finite positions are dropped and return `None`
    pub fn spawn(&mut self, position: NVec2, species: Species) -> Option<usize> {
        let slot = self.store.spawn(position, species)?;
        debug!(slot, species = species.name(), x = position.x, y = position.y, "spawned particle");
        Some(slot)
    }

    /// Spawn under a canvas pixel
    pub fn spawn_at_pixel(&mut self, x: f64, y: f64, species: Species) -> Option<usize> {
        let position = self.projection.pixel_to_world(x, y);
        self.spawn(position, species)
    }

    /// Fresh uniform draw for every matrix cell
    pub fn reseed(&mut self) {
        self.matrix.reseed(&mut self.rng);
        for (s, row) in self.matrix.rows().enumerate() {
            debug!(row = s, coefficients = ?row, "attraction row");
        }
    }

    /// Owned copy of the current generation for a rendering sink
    pub fn snapshot(&self) -> Vec<Particle> {
        self.store.snapshot()
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn matrix(&self) -> &AttractionMatrix {
        &self.matrix
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Species used at setup; spawn keys pick from these
    pub fn species(&self) -> &[Species] {
        let all: &'static [Species] = &Species::ALL;
        &all[..self.species_count.min(Species::COUNT)]
    }

    /// Steps taken so far
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(yaml: &str) -> Simulation {
        let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
        Simulation::build(&cfg).unwrap()
    }

    #[test]
    fn same_seed_same_population() {
        let yaml = "engine: { seed: 11 }\nparticles: { count: 50 }";
        let a = seeded(yaml);
        let b = seeded(yaml);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn build_rejects_invalid_config() {
        let cfg = ScenarioConfig::from_yaml_str("particles: { count: 0 }").unwrap();
        assert!(matches!(Simulation::build(&cfg), Err(SimError::InvalidConfiguration(_))));
    }

    #[test]
    fn new_rejects_bad_frame_rate() {
        let cfg = ScenarioConfig::from_yaml_str("particles: { count: 4 }").unwrap();
        let projection = cfg.projection().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let store = ParticleStore::setup(
            projection.world().unwrap(),
            4,
            2,
            cfg.particles.initial_velocity,
            &mut rng,
        )
        .unwrap();
        let engine = Engine { frame_rate: 0.0, ..Engine::default() };

        let built = Simulation::new(
            engine,
            Parameters::default(),
            projection,
            store,
            AttractionMatrix::standard(2),
            rng,
        );
        assert!(matches!(built, Err(SimError::InvalidConfiguration(_))));
    }

    #[test]
    fn random_attraction_is_drawn_at_build() {
        let sim = seeded("engine: { seed: 3 }\nattraction: { random: true }");
        assert_ne!(sim.matrix(), &AttractionMatrix::standard(6));
    }

    #[test]
    fn apply_routes_commands() {
        let mut sim = seeded("engine: { seed: 5 }\nparticles: { count: 4, species_count: 2 }");

        let flow = sim.apply(Command::Spawn {
            pixel_x: 400.0,
            pixel_y: 300.0,
            species: Species::Orange,
        });
        assert_eq!(flow, Flow::Continue);
        assert_eq!(sim.store().particles()[0].position, NVec2::zeros());
        assert_eq!(sim.store().particles()[0].species, Species::Orange);

        let before = sim.matrix().clone();
        assert_eq!(sim.apply(Command::Reseed), Flow::Continue);
        assert_ne!(sim.matrix(), &before);

        assert_eq!(sim.apply(Command::Terminate), Flow::Terminate);
        assert_eq!(sim.species(), &[Species::Red, Species::Orange]);
    }

    #[test]
    fn non_finite_spawn_leaves_population_finite() {
        let mut sim = seeded("engine: { seed: 8 }\nparticles: { count: 50 }");
        let before = sim.snapshot();

        let flow = sim.apply(Command::Spawn {
            pixel_x: f64::NAN,
            pixel_y: 10.0,
            species: Species::Red,
        });
        assert_eq!(flow, Flow::Continue);
        assert_eq!(sim.snapshot(), before);
        assert_eq!(sim.spawn_at_pixel(f64::INFINITY, 0.0, Species::Red), None);

        for _ in 0..3 {
            sim.step();
        }
        for p in sim.snapshot() {
            assert!(p.position.x.is_finite() && p.position.y.is_finite());
            assert!(p.velocity.x.is_finite() && p.velocity.y.is_finite());
        }
    }
}
