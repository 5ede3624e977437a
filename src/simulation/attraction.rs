//! Species-to-species attraction coefficients
//!
//! `AttractionMatrix` is a dense K x K table indexed by
//! `[source][target]`: the entry is how strongly a particle of species
//! `source` pulls (positive) or pushes (negative) a particle of species
//! `target` inside the attraction zone. It is square but not symmetric.
//! Coefficients live in `[-COEFFICIENT_BOUND, COEFFICIENT_BOUND]` and are
//! scaled by `Parameters::max_attraction` when a force is evaluated.

use rand::Rng;
use tracing::info;

use super::species::Species;
use crate::error::SimError;

/// Symmetric bound for every coefficient
pub const COEFFICIENT_BOUND: f64 = 1.0;

const STANDARD_TABLE: [[f64; Species::COUNT]; Species::COUNT] = [
    [1.0, 0.5, 0.0, 0.5, 0.0, 0.0],
    [0.0, 1.0, 0.5, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.5, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0, 0.5, 0.0],
    [0.0, 0.0, 0.0, 0.0, 1.0, 0.5],
    [0.5, 0.0, 0.0, 0.0, 0.0, 1.0],
];

#[derive(Debug, Clone, PartialEq)]
pub struct AttractionMatrix {
    size: usize,
    cells: Vec<f64>, // row-major, `size * size`
}

impl AttractionMatrix {
    /// All-zero matrix for `size` species
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            cells: vec![0.0; size * size],
        }
    }

    /// The stock table, cut down to the first `size` species: every species
    /// holds on to its own kind and pulls the next species along, red also
    /// pulls green
    pub fn standard(size: usize) -> Self {
        let size = size.min(Species::COUNT);
        let mut m = Self::zeros(size);
        for s in 0..size {
            for t in 0..size {
                m.cells[s * size + t] = STANDARD_TABLE[s][t];
            }
        }
        m
    }

    /// Build from explicit rows, rejecting ragged or out-of-range tables
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, SimError> {
        let size = rows.len();
        if size == 0 || size > Species::COUNT {
            return Err(SimError::invalid(format!(
                "attraction matrix must have 1..={} rows, got {size}",
                Species::COUNT
            )));
        }

        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(SimError::invalid(format!(
                    "attraction matrix row {r} has {} entries, expected {size}",
                    row.len()
                )));
            }
            for (c, &v) in row.iter().enumerate() {
                if !v.is_finite() || v.abs() > COEFFICIENT_BOUND {
                    return Err(SimError::invalid(format!(
                        "attraction coefficient [{r}][{c}] = {v} outside [-{COEFFICIENT_BOUND}, {COEFFICIENT_BOUND}]"
                    )));
                }
                cells.push(v);
            }
        }
        Ok(Self { size, cells })
    }

    /// Matrix filled with fresh uniform draws
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut m = Self::zeros(size);
        m.reseed(rng);
        m
    }

    /// Number of species covered
    pub fn size(&self) -> usize {
        self.size
    }

    /// Coefficient `source` exerts on `target`
    ///
    /// Species outside the table read as zero so one stray particle never
    /// stops the step.
    pub fn coefficient(&self, source: Species, target: Species) -> f64 {
        self.get(source.index(), target.index()).unwrap_or(0.0)
    }

    pub fn get(&self, source: usize, target: usize) -> Option<f64> {
        if source < self.size && target < self.size {
            Some(self.cells[source * self.size + target])
        } else {
            None
        }
    }

    /// Overwrite every cell with an independent draw from
    /// `[-COEFFICIENT_BOUND, COEFFICIENT_BOUND]`
    pub fn reseed<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in self.cells.iter_mut() {
            *cell = rng.gen_range(-COEFFICIENT_BOUND..=COEFFICIENT_BOUND);
        }
        info!(size = self.size, "reseeded attraction matrix");
    }

    /// Rows in index order, for logging and inspection
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.size.max(1))
    }
}
