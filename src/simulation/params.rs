//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings in world units:
//! - force radii `rmin` / `rmax` (best distance is their midpoint),
//! - universal repulsion strength and attraction scale,
//! - friction applied to velocity each step,
//! - whether velocity is truncated to whole units after each step

use crate::error::SimError;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub rmin: f64,            // below this every pair repels
    pub rmax: f64,            // beyond this pairs do not interact
    pub repel: f64,           // repulsion magnitude at distance 0
    pub max_attraction: f64,  // scale applied to matrix coefficients
    pub friction: f64,        // velocity multiplier per step, (0, 1]
    pub quantize_velocity: bool, // truncate velocity toward zero each step
}

impl Parameters {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.rmin.is_finite() && self.rmin > 0.0) {
            return Err(SimError::invalid(format!("rmin must be positive, got {}", self.rmin)));
        }
        if !(self.rmax.is_finite() && self.rmax > self.rmin) {
            return Err(SimError::invalid(format!(
                "rmax must be greater than rmin ({}), got {}",
                self.rmin, self.rmax
            )));
        }
        if !(self.repel.is_finite() && self.repel >= 0.0) {
            return Err(SimError::invalid(format!("repel must be >= 0, got {}", self.repel)));
        }
        if !(self.max_attraction.is_finite() && self.max_attraction >= 0.0) {
            return Err(SimError::invalid(format!(
                "max_attraction must be >= 0, got {}",
                self.max_attraction
            )));
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(SimError::invalid(format!(
                "friction must be in (0, 1], got {}",
                self.friction
            )));
        }
        Ok(())
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            rmin: 10.0,
            rmax: 300.0,
            repel: 8.0,
            max_attraction: 10.0,
            friction: 0.5,
            quantize_velocity: true,
        }
    }
}
