//! Layers and the layer stack.
//!
//! Every simulation, UI and input subsystem plugs into the application as a
//! [`Layer`]. The [`LayerStack`] fixes the order in which they are updated,
//! rendered and offered events.

mod layer;
mod stack;

pub use layer::{Layer, LayerCtx};
pub use stack::{LayerId, LayerStack};
