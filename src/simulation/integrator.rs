//! Fixed-step integrator for the particle system
//!
//! One step is a unit-mass, unit-timestep Euler update split into phases so
//! no particle ever reads a neighbour's half-written state:
//!
//! 1. drift: `x += v`, wrap onto the torus, `v *= friction`
//! 2. kick: each drifted particle accumulates pairwise forces from its
//!    neighbours as they stood at the end of the previous tick
//! 3. commit: `v += force` (truncated toward zero when quantised) and swap
//!    the new generation into the store

use super::attraction::AttractionMatrix;
use super::forces::ForceLaw;
use super::geometry;
use super::params::Parameters;
use super::states::{NVec2, Particle, ParticleStore, World};

/// Advance every particle in `store` by one step
pub fn euler_step(
    store: &mut ParticleStore,
    law: &ForceLaw,
    matrix: &AttractionMatrix,
    params: &Parameters,
    parallel: bool,
) {
    let n = store.capacity();
    if n == 0 {
        return;
    }
    let world = *store.world();

    let prior = store.particles();

    let drifted: Vec<Particle> = prior
        .iter()
        .map(|p| drift(p, &world, params.friction))
        .collect();

    // Kick: moved targets, neighbours read from the prior tick
    let mut forces = vec![NVec2::zeros(); n];
    law.accumulate(&drifted, prior, &world, matrix, &mut forces, parallel);

    let mut next: Vec<Particle> = drifted
        .iter()
        .zip(forces.iter())
        .map(|(p, f)| {
            let mut velocity = p.velocity + f;
            if params.quantize_velocity {
                velocity = velocity.map(f64::trunc);
            }
            Particle { velocity, ..*p }
        })
        .collect();

    store.commit(&mut next);
}

/// Move one particle by its velocity, wrap it and apply friction
pub fn drift(p: &Particle, world: &World, friction: f64) -> Particle {
    let moved = p.position + p.velocity;
    Particle {
        position: geometry::wrap_position(&moved, world),
        velocity: p.velocity * friction,
        species: p.species,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::species::Species;

    #[test]
    fn drift_moves_wraps_and_damps() {
        let world = World::new(800, 600).unwrap();
        let p = Particle {
            position: NVec2::new(390.0, -295.0),
            velocity: NVec2::new(10.0, -6.0),
            species: Species::Red,
        };
        let d = drift(&p, &world, 0.5);
        assert_eq!(d.position, NVec2::new(-400.0, 299.0));
        assert_eq!(d.velocity, NVec2::new(5.0, -3.0));
        assert_eq!(d.species, Species::Red);
    }

    #[test]
    fn quantised_step_keeps_whole_units() {
        let world = World::new(800, 600).unwrap();
        let particles = vec![
            Particle::at_rest(NVec2::new(0.0, 0.0), Species::Red),
            Particle::at_rest(NVec2::new(3.0, 4.0), Species::Red),
            Particle::at_rest(NVec2::new(-50.0, 20.0), Species::Orange),
        ];
        let mut store = ParticleStore::from_particles(world, particles).unwrap();
        let params = Parameters::default();
        let law = ForceLaw::from_parameters(&params);
        let matrix = AttractionMatrix::standard(2);

        for _ in 0..20 {
            euler_step(&mut store, &law, &matrix, &params, false);
            for p in store.particles() {
                assert_eq!(p.velocity.x.fract(), 0.0);
                assert_eq!(p.velocity.y.fract(), 0.0);
                assert_eq!(p.position.x.fract(), 0.0);
                assert!(world.contains(&p.position));
            }
        }
    }

    #[test]
    fn neighbours_are_read_at_their_prior_positions() {
        // B drifts from 12 (attraction zone) to 8 (repulsion zone); A must
        // still see it at 12
        let world = World::new(800, 600).unwrap();
        let particles = vec![
            Particle::at_rest(NVec2::zeros(), Species::Red),
            Particle {
                position: NVec2::new(12.0, 0.0),
                velocity: NVec2::new(-4.0, 0.0),
                species: Species::Red,
            },
        ];
        let mut store = ParticleStore::from_particles(world, particles).unwrap();
        let params = Parameters::default();
        let law = ForceLaw::from_parameters(&params);
        let matrix = AttractionMatrix::standard(2);

        euler_step(&mut store, &law, &matrix, &params, false);

        // 10 * 2/145 toward B truncates to nothing, no repulsion
        let a = store.particles()[0];
        assert_eq!(a.velocity, NVec2::zeros());
        assert_eq!(a.position, NVec2::zeros());

        // B moved to 8 and is pushed back from A at 0: -2 + 1.6 truncates to 0
        let b = store.particles()[1];
        assert_eq!(b.position, NVec2::new(8.0, 0.0));
        assert_eq!(b.velocity, NVec2::zeros());
    }

    #[test]
    fn continuous_step_keeps_fractional_velocity() {
        let world = World::new(800, 600).unwrap();
        let particles = vec![Particle {
            position: NVec2::zeros(),
            velocity: NVec2::new(3.0, 0.0),
            species: Species::Red,
        }];
        let mut store = ParticleStore::from_particles(world, particles).unwrap();
        let params = Parameters {
            friction: 0.25,
            quantize_velocity: false,
            ..Parameters::default()
        };
        let law = ForceLaw::from_parameters(&params);
        let matrix = AttractionMatrix::standard(2);

        euler_step(&mut store, &law, &matrix, &params, false);
        assert_eq!(store.particles()[0].velocity, NVec2::new(0.75, 0.0));
        assert_eq!(store.particles()[0].position, NVec2::new(3.0, 0.0));
    }
}
