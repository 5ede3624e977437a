//! High-level runtime engine settings
//!
//! Selects how the step is executed and how fast the drive loop ticks
//! when running a `Simulation`

use crate::error::SimError;

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub parallel: bool,   // split force accumulation across rayon workers
    pub frame_rate: f64,  // ticks per second of the drive loop
    pub seed: Option<u64>, // None = seed from entropy
}

impl Engine {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(SimError::invalid(format!(
                "frame_rate must be positive, got {}",
                self.frame_rate
            )));
        }
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            parallel: true,
            frame_rate: 60.0,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_frame_rate() {
        assert!(Engine::default().validate().is_ok());
        for rate in [0.0, -30.0, f64::NAN, f64::INFINITY] {
            let e = Engine { frame_rate: rate, ..Engine::default() };
            assert!(e.validate().is_err(), "accepted {rate}");
        }
    }
}
