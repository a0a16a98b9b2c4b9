use std::time::Instant;

use super::Timestep;

/// Source of "now" for the frame scheduler, in seconds.
///
/// Must be non-decreasing. The application reads it once per iteration.
pub trait TimeSource {
    fn now(&self) -> f64;
}

/// Wall-clock source: seconds elapsed since construction.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    pub timestep: Timestep,

    /// Clock reading taken at the tick, in seconds.
    pub now: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Turns successive clock readings into timesteps.
///
/// The first tick has no previous frame and yields `Timestep::ZERO`. A reading
/// older than the previous one yields zero rather than a negative step.
/// The step is the raw difference by default. An optional `max_step` caps it
/// after long stalls (debugger, window drag) for simulations that need it.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    frame_index: u64,
    max_step: Option<f32>,
}

impl FrameClock {
    pub fn new(max_step: Option<f32>) -> Self {
        debug_assert!(max_step.is_none_or(|m| m > 0.0));
        Self {
            last: None,
            frame_index: 0,
            max_step,
        }
    }

    /// Forgets the previous reading; the next tick yields zero.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn tick(&mut self, now: f64) -> FrameTime {
        let raw = match self.last {
            Some(last) => (now - last).max(0.0) as f32,
            None => 0.0,
        };
        let dt = match self.max_step {
            Some(max) => raw.min(max),
            None => raw,
        };

        self.last = Some(now);

        let ft = FrameTime {
            timestep: Timestep::from_seconds(dt),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(None)
    }
}
