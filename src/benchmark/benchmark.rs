use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::configuration::config::InitialVelocity;
use crate::error::SimError;
use crate::simulation::attraction::AttractionMatrix;
use crate::simulation::forces::ForceLaw;
use crate::simulation::integrator::euler_step;
use crate::simulation::params::Parameters;
use crate::simulation::species::Species;
use crate::simulation::states::{ParticleStore, World};

/// Helper to build a seeded store of size `n` on an 800x600 world
fn make_store(n: usize) -> Result<ParticleStore, SimError> {
    let world = World::new(800, 600)?;
    let mut rng = StdRng::seed_from_u64(42);
    ParticleStore::setup(world, n, Species::COUNT, InitialVelocity::Zero, &mut rng)
}

/// Milliseconds per step, averaged over `steps`
fn time_steps(store: &mut ParticleStore, parallel: bool, steps: usize) -> f64 {
    let params = Parameters::default();
    let law = ForceLaw::from_parameters(&params);
    let matrix = AttractionMatrix::standard(Species::COUNT);

    let t0 = Instant::now();
    for _ in 0..steps {
        euler_step(store, &law, &matrix, &params, parallel);
    }
    t0.elapsed().as_secs_f64() * 1000.0 / steps as f64
}

/// Sequential vs rayon step time for a range of n
/// Paste output directly into a spreadsheet to graph
pub fn bench_step_curve() -> Result<(), SimError> {
    println!("N,sequential_ms,parallel_ms");

    for n in (250..=4000).step_by(250) {
        // Small n: average over a few steps to smooth noise
        let steps = if n <= 1000 { 5 } else { 1 };

        let template = make_store(n)?;

        let mut seq = template.clone();
        let ms_seq = time_steps(&mut seq, false, steps);

        let mut par = template.clone();
        let ms_par = time_steps(&mut par, true, steps);

        println!("{},{:.6},{:.6}", n, ms_seq, ms_par);
    }
    Ok(())
}
