//! Headless drive loop
//!
//! Each frame: drain the input source, advance the simulation by exactly
//! one step, hand a snapshot to the rendering sink, then sleep out the rest
//! of the frame budget. Input is only ever applied between steps.

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::simulation::projection::Projection;
use crate::simulation::scenario::Simulation;
use crate::simulation::species::Species;
use crate::simulation::states::Particle;

/// Discrete input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Spawn {
        pixel_x: f64,
        pixel_y: f64,
        species: Species,
    },
    Reseed,
    Terminate,
}

/// Whether the drive loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Terminate,
}

/// Source of input events, polled once per frame
pub trait InputSource {
    fn poll(&mut self, frame: u64) -> Vec<Command>;
}

/// Consumer of one read-only particle snapshot per frame
pub trait RenderSink {
    fn present(&mut self, frame: u64, particles: &[Particle], projection: &Projection);
}

/// No input at all
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, _frame: u64) -> Vec<Command> {
        Vec::new()
    }
}

/// Replays `(frame, command)` pairs, delivering each when its frame comes up
#[derive(Debug, Default)]
pub struct ScriptedInput {
    events: VecDeque<(u64, Command)>,
}

impl ScriptedInput {
    pub fn new(mut events: Vec<(u64, Command)>) -> Self {
        events.sort_by_key(|(frame, _)| *frame);
        Self {
            events: events.into(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, frame: u64) -> Vec<Command> {
        let mut due = Vec::new();
        while let Some((at, _)) = self.events.front() {
            if *at > frame {
                break;
            }
            if let Some((_, cmd)) = self.events.pop_front() {
                due.push(cmd);
            }
        }
        due
    }
}

/// Logs per-species population and mean speed every `every` frames
pub struct StatsSink {
    every: u64,
}

impl StatsSink {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl RenderSink for StatsSink {
    fn present(&mut self, frame: u64, particles: &[Particle], _projection: &Projection) {
        if frame % self.every != 0 {
            return;
        }
        let mut counts = [0usize; Species::COUNT];
        let mut speed = 0.0;
        for p in particles {
            counts[p.species.index()] += 1;
            speed += p.velocity.norm();
        }
        let mean_speed = speed / particles.len().max(1) as f64;
        info!(frame, ?counts, mean_speed, "frame stats");
    }
}

/// Fixed-budget frame loop
#[derive(Debug, Clone)]
pub struct FrameLoop {
    frame_budget: Duration,
    max_frames: Option<u64>,
}

impl FrameLoop {
    /// Pace to `frame_rate` ticks per second; a rate that is not finite and
    /// positive runs unpaced
    pub fn new(frame_rate: f64) -> Self {
        let budget = if frame_rate > 0.0 {
            Duration::try_from_secs_f64(1.0 / frame_rate).ok()
        } else {
            None
        };
        match budget {
            Some(frame_budget) => Self {
                frame_budget,
                max_frames: None,
            },
            None => {
                warn!(frame_rate, "invalid frame rate, running unpaced");
                Self::unpaced()
            }
        }
    }

    /// Run as fast as the step allows
    pub fn unpaced() -> Self {
        Self {
            frame_budget: Duration::ZERO,
            max_frames: None,
        }
    }

    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Drive `sim` until terminated or `max_frames` steps have run
    /// Returns the number of steps taken
    pub fn run(
        &self,
        sim: &mut Simulation,
        input: &mut dyn InputSource,
        sink: &mut dyn RenderSink,
    ) -> u64 {
        let mut frames = 0u64;

        'frames: loop {
            if self.max_frames.is_some_and(|max| frames >= max) {
                break;
            }
            let started = Instant::now();

            for cmd in input.poll(frames) {
                if sim.apply(cmd) == Flow::Terminate {
                    break 'frames;
                }
            }

            sim.step();
            frames += 1;

            let snapshot = sim.snapshot();
            sink.present(frames, &snapshot, sim.projection());

            let elapsed = started.elapsed();
            if elapsed < self.frame_budget {
                thread::sleep(self.frame_budget - elapsed);
            } else if !self.frame_budget.is_zero() {
                debug!(frame = frames, ?elapsed, "frame over budget");
            }
        }

        info!(frames, "drive loop finished");
        frames
    }
}
