//! Ember engine crate.
//!
//! The application core of the Ember editor/sandbox: typed events with
//! single-consumer-wins dispatch, the two-region layer stack, and the frame
//! scheduler that drives them, plus the winit/wgpu window backend it runs on.

pub mod core;
pub mod coords;
pub mod device;
pub mod events;
pub mod input;
pub mod layer;
pub mod logging;
pub mod render;
pub mod time;
pub mod ui;
pub mod window;
