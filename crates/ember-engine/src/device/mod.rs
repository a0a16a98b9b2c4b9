//! GPU device + surface management.
//!
//! Creates the wgpu adapter/device/queue for a window, keeps its surface
//! configured across resizes and presents one cleared frame per service call.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
