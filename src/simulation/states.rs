//! Core state types for the particle simulation
//!
//! - `Particle`: position, velocity and species of one slot
//! - `World`: size of the periodic domain in world units
//! - `ParticleStore`: the fixed-capacity particle array plus its `World`
//!
//! The store never grows after setup. Spawning overwrites a slot picked by a
//! rotating cursor, so the oldest spawn is evicted first.

use nalgebra::Vector2;
use rand::Rng;
use tracing::{debug, warn};

use super::geometry;
use super::species::Species;
use crate::configuration::config::InitialVelocity;
use crate::error::SimError;

pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: NVec2, // world units, canonical range after every step
    pub velocity: NVec2, // world units per step
    pub species: Species,
}

impl Particle {
    /// Particle at rest
    pub fn at_rest(position: NVec2, species: Species) -> Self {
        Self {
            position,
            velocity: NVec2::zeros(),
            species,
        }
    }
}

/// Periodic domain size in world units, fixed for the lifetime of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct World {
    width: u32,
    height: u32,
}

impl World {
    pub fn new(width: u32, height: u32) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::invalid(format!(
                "world dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width_f64(&self) -> f64 {
        self.width as f64
    }

    pub fn height_f64(&self) -> f64 {
        self.height as f64
    }

    /// Whether `p` is inside `[-w/2, w/2) x [-h/2, h/2)`
    pub fn contains(&self, p: &NVec2) -> bool {
        let hw = self.width_f64() / 2.0;
        let hh = self.height_f64() / 2.0;
        p.x >= -hw && p.x < hw && p.y >= -hh && p.y < hh
    }
}

#[derive(Debug, Clone)]
pub struct ParticleStore {
    world: World,
    particles: Vec<Particle>,
    spawn_cursor: usize, // next slot `spawn` overwrites (mod capacity)
}

impl ParticleStore {
    /// Populate `count` particles uniformly over the world with species drawn
    /// uniformly from the first `species_count` species
    ///
    /// Positions are whole world units, as the integer-quantised step expects.
    pub fn setup<R: Rng + ?Sized>(
        world: World,
        count: usize,
        species_count: usize,
        initial_velocity: InitialVelocity,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        if count == 0 {
            return Err(SimError::invalid("particle capacity must be at least 1"));
        }
        if !(2..=Species::COUNT).contains(&species_count) {
            return Err(SimError::invalid(format!(
                "species_count must be in 2..={}, got {species_count}",
                Species::COUNT
            )));
        }

        let half_w = (world.width() / 2) as f64;
        let half_h = (world.height() / 2) as f64;

        let particles = (0..count)
            .map(|_| {
                let raw = NVec2::new(
                    rng.gen_range(0..world.width()) as f64 - half_w,
                    rng.gen_range(0..world.height()) as f64 - half_h,
                );
                let position = geometry::wrap_position(&raw, &world);

                let velocity = match initial_velocity {
                    InitialVelocity::Zero => NVec2::zeros(),
                    InitialVelocity::RandomUnit => NVec2::new(
                        rng.gen_range(-1..=1) as f64,
                        rng.gen_range(-1..=1) as f64,
                    ),
                };

                let species = Species::ALL[rng.gen_range(0..species_count)];

                Particle {
                    position,
                    velocity,
                    species,
                }
            })
            .collect();

        debug!(count, species_count, ?initial_velocity, "populated particle store");

        Ok(Self {
            world,
            particles,
            spawn_cursor: 0,
        })
    }

    /// Build a store from explicit particles (positions are canonicalised)
    pub fn from_particles(world: World, mut particles: Vec<Particle>) -> Result<Self, SimError> {
        if particles.is_empty() {
            return Err(SimError::invalid("particle capacity must be at least 1"));
        }
        for p in particles.iter_mut() {
            p.position = geometry::wrap_position(&p.position, &world);
        }
        Ok(Self {
            world,
            particles,
            spawn_cursor: 0,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Fixed number of slots
    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// Read-only view of the live particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Owned point-in-time copy for a rendering sink
    pub fn snapshot(&self) -> Vec<Particle> {
        self.particles.clone()
    }

    /// Slot the next `spawn` will overwrite
    pub fn next_spawn_slot(&self) -> usize {
        self.spawn_cursor % self.particles.len()
    }

    /// Overwrite the next ring slot with a resting particle at `position`
    ///
    /// Returns the slot that was written, or `None` when `position` is not
    /// finite; the store and the cursor are left untouched in that case.
    pub fn spawn(&mut self, position: NVec2, species: Species) -> Option<usize> {
        if !(position.x.is_finite() && position.y.is_finite()) {
            warn!(x = position.x, y = position.y, "ignoring spawn at non-finite position");
            return None;
        }
        let slot = self.next_spawn_slot();
        let position = geometry::wrap_position(&position, &self.world);
        self.particles[slot] = Particle::at_rest(position, species);
        self.spawn_cursor = (slot + 1) % self.particles.len();
        Some(slot)
    }

    /// Swap in the next generation computed by the stepper
    pub(crate) fn commit(&mut self, next: &mut Vec<Particle>) {
        debug_assert_eq!(next.len(), self.particles.len());
        std::mem::swap(&mut self.particles, next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn world_rejects_zero_dimensions() {
        assert!(World::new(0, 600).is_err());
        assert!(World::new(800, 0).is_err());
        assert!(World::new(1, 1).is_ok());
    }

    #[test]
    fn setup_places_everything_in_range() {
        let world = World::new(801, 599).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let store = ParticleStore::setup(world, 2000, 6, InitialVelocity::Zero, &mut rng).unwrap();

        assert_eq!(store.capacity(), 2000);
        for p in store.particles() {
            assert!(world.contains(&p.position), "{:?} out of world", p.position);
            assert_eq!(p.position.x.fract(), 0.0);
            assert_eq!(p.position.y.fract(), 0.0);
            assert_eq!(p.velocity, NVec2::zeros());
        }
    }

    #[test]
    fn setup_only_uses_requested_species() {
        let world = World::new(800, 600).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let store = ParticleStore::setup(world, 500, 2, InitialVelocity::RandomUnit, &mut rng).unwrap();

        for p in store.particles() {
            assert!(p.species.index() < 2);
            assert!(p.velocity.x.abs() <= 1.0 && p.velocity.y.abs() <= 1.0);
        }
    }

    #[test]
    fn setup_rejects_zero_capacity_and_bad_species_count() {
        let world = World::new(800, 600).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(ParticleStore::setup(world, 0, 6, InitialVelocity::Zero, &mut rng).is_err());
        assert!(ParticleStore::setup(world, 10, 1, InitialVelocity::Zero, &mut rng).is_err());
        assert!(ParticleStore::setup(world, 10, 7, InitialVelocity::Zero, &mut rng).is_err());
    }

    #[test]
    fn spawn_rotates_through_slots() {
        let world = World::new(800, 600).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut store = ParticleStore::setup(world, 3, 6, InitialVelocity::Zero, &mut rng).unwrap();

        let slots: Vec<usize> = (0..7)
            .map(|i| store.spawn(NVec2::new(i as f64, 0.0), Species::Green).unwrap())
            .collect();
        assert_eq!(slots, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(store.capacity(), 3);
        assert_eq!(store.particles()[0].position.x, 6.0);
    }

    #[test]
    fn spawn_wraps_out_of_range_positions() {
        let world = World::new(800, 600).unwrap();
        let mut store = ParticleStore::from_particles(
            world,
            vec![Particle::at_rest(NVec2::zeros(), Species::Red)],
        )
        .unwrap();
        store.spawn(NVec2::new(400.0, -301.0), Species::Blue);
        let p = store.particles()[0];
        assert_eq!(p.position, NVec2::new(-400.0, 299.0));
        assert_eq!(p.species, Species::Blue);
    }

    #[test]
    fn spawn_rejects_non_finite_positions() {
        let world = World::new(800, 600).unwrap();
        let mut store = ParticleStore::from_particles(
            world,
            vec![
                Particle::at_rest(NVec2::new(1.0, 1.0), Species::Red),
                Particle::at_rest(NVec2::new(2.0, 2.0), Species::Red),
            ],
        )
        .unwrap();

        assert_eq!(store.spawn(NVec2::new(f64::NAN, 0.0), Species::Blue), None);
        assert_eq!(store.spawn(NVec2::new(0.0, f64::INFINITY), Species::Blue), None);
        assert_eq!(store.next_spawn_slot(), 0);
        assert_eq!(store.particles()[0].position, NVec2::new(1.0, 1.0));
        assert_eq!(store.particles()[0].species, Species::Red);

        assert_eq!(store.spawn(NVec2::new(5.0, 5.0), Species::Blue), Some(0));
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let world = World::new(800, 600).unwrap();
        let mut store = ParticleStore::from_particles(
            world,
            vec![Particle::at_rest(NVec2::new(1.0, 1.0), Species::Red)],
        )
        .unwrap();
        let snap = store.snapshot();
        store.spawn(NVec2::new(50.0, 50.0), Species::Green);
        assert_eq!(snap[0].position, NVec2::new(1.0, 1.0));
        assert_eq!(snap[0].species, Species::Red);
    }
}
