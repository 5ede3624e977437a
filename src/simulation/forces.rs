//! Pairwise force law for the particle engine
//!
//! `ForceLaw` turns a wrap-aware distance and a species pair into a signed
//! radial magnitude (positive pulls the target toward the source, negative
//! pushes it away). `ForceLaw::accumulate` sums those contributions for
//! every moved target against the frozen prior-tick neighbours.

use rayon::prelude::*;

use super::attraction::AttractionMatrix;
use super::geometry;
use super::params::Parameters;
use super::species::Species;
use super::states::{NVec2, Particle, World};

/// Piecewise radial force with three zones:
///
/// ```text
///  repel            ramp up          ramp down
/// |-------------|---------------|---------------|----> distance
/// 0            rmin           rbest           rmax
/// ```
///
/// - `d > rmax`: no interaction
/// - `d < rmin`: `-repel * (1 - d / rmin)`, strongest at `d = 0`, zero at `rmin`
/// - `rmin <= d <= rmax`: `coefficient * max_attraction * envelope(d)` with a
///   triangular envelope that is 0 at `rmin`, 1 at `rbest` and 0 at `rmax`
///
/// Both zone edges are continuous: the law is 0 on either side of `rmin`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceLaw {
    pub rmin: f64,
    pub rmax: f64,
    pub repel: f64,
    pub max_attraction: f64,
}

impl ForceLaw {
    pub fn from_parameters(p: &Parameters) -> Self {
        Self {
            rmin: p.rmin,
            rmax: p.rmax,
            repel: p.repel,
            max_attraction: p.max_attraction,
        }
    }

    /// Midpoint of the attraction zone, where the envelope peaks
    pub fn rbest(&self) -> f64 {
        0.5 * (self.rmin + self.rmax)
    }

    /// Signed magnitude of the force `source` exerts on `target` at `distance`
    pub fn magnitude(
        &self,
        matrix: &AttractionMatrix,
        distance: f64,
        source: Species,
        target: Species,
    ) -> f64 {
        if !(distance <= self.rmax) {
            return 0.0;
        }
        if distance < self.rmin {
            return self.repulsion(distance);
        }
        self.attraction(distance, matrix.coefficient(source, target))
    }

    /// Universal short-range repulsion, independent of species
    pub fn repulsion(&self, distance: f64) -> f64 {
        -self.repel * (1.0 - distance / self.rmin)
    }

    /// Species-dependent term for `rmin <= distance <= rmax`
    pub fn attraction(&self, distance: f64, coefficient: f64) -> f64 {
        coefficient * self.max_attraction * self.envelope(distance)
    }

    /// Triangle peaking at `rbest`, 0 outside `[rmin, rmax]`
    pub fn envelope(&self, distance: f64) -> f64 {
        let rbest = self.rbest();
        if distance < self.rmin || distance > self.rmax {
            0.0
        } else if distance <= rbest {
            (distance - self.rmin) / (rbest - self.rmin)
        } else {
            (self.rmax - distance) / (self.rmax - rbest)
        }
    }

    /// Net force on `target` (occupying slot `i`) from every other particle
    /// in `neighbours`
    ///
    /// `target` may already have moved this step while `neighbours` stays at
    /// the prior tick.
    pub fn force_on(
        &self,
        i: usize,
        target: &Particle,
        neighbours: &[Particle],
        world: &World,
        matrix: &AttractionMatrix,
    ) -> NVec2 {
        let mut acc = NVec2::zeros();

        for (j, source) in neighbours.iter().enumerate() {
            if i == j {
                continue;
            }

            // Wrapped displacement target -> source, so positive magnitude
            // points the target at the source
            let d = geometry::delta(&target.position, &source.position, world);
            let dist = d.norm();
            // NaN distances fall through here too
            if !(dist <= self.rmax) {
                continue;
            }

            let m = self.magnitude(matrix, dist, source.species, target.species);
            let angle = geometry::angle_of(&d);
            acc += NVec2::new(m * angle.cos(), m * angle.sin());
        }

        acc
    }

    /// Compute the net force on every `targets[i]` into `out`
    ///
    /// Reads only `targets` and `neighbours`; each `out[i]` is written by
    /// exactly one task, so the parallel path produces the same sums as the
    /// sequential one.
    pub fn accumulate(
        &self,
        targets: &[Particle],
        neighbours: &[Particle],
        world: &World,
        matrix: &AttractionMatrix,
        out: &mut [NVec2],
        parallel: bool,
    ) {
        debug_assert_eq!(targets.len(), out.len());
        debug_assert_eq!(neighbours.len(), out.len());

        if parallel {
            out.par_iter_mut()
                .enumerate()
                .for_each(|(i, f)| *f = self.force_on(i, &targets[i], neighbours, world, matrix));
        } else {
            for (i, f) in out.iter_mut().enumerate() {
                *f = self.force_on(i, &targets[i], neighbours, world, matrix);
            }
        }
    }
}
