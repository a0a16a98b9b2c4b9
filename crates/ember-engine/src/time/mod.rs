//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the
//! platform:
//! - a `TimeSource` reads "now" (monotonic by default, scripted in tests)
//! - a `FrameClock` turns consecutive readings into `Timestep`s
//! - a `ProfileScope` measures one phase of a frame into a `FrameProfile`

mod frame_clock;
mod profile;
mod timestep;

pub use frame_clock::{FrameClock, FrameTime, MonotonicClock, TimeSource};
pub use profile::{FrameProfile, ProfileScope};
pub use timestep::Timestep;
