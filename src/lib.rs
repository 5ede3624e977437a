pub mod simulation;
pub mod configuration;
pub mod driver;
pub mod error;
#[cfg(feature = "viewer")]
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{NVec2, Particle, ParticleStore, World};
pub use simulation::species::Species;
pub use simulation::attraction::AttractionMatrix;
pub use simulation::forces::ForceLaw;
pub use simulation::integrator::euler_step;
pub use simulation::params::Parameters;
pub use simulation::engine::Engine;
pub use simulation::projection::Projection;
pub use simulation::scenario::Simulation;

pub use configuration::config::{
    AttractionConfig, EngineConfig, InitialVelocity, ParametersConfig, ParticlesConfig, ScenarioConfig, WorldConfig,
};

pub use driver::{Command, FrameLoop, Flow, InputSource, NoInput, RenderSink, ScriptedInput, StatsSink};
pub use error::SimError;

#[cfg(feature = "viewer")]
pub use visualization::plife_vis2d::run_2d;

pub use benchmark::benchmark::bench_step_curve;
