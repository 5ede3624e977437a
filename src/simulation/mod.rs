pub mod species;
pub mod states;
pub mod params;
pub mod engine;
pub mod geometry;
pub mod attraction;
pub mod forces;
pub mod integrator;
pub mod projection;
pub mod scenario;
