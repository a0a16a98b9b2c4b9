use crate::device::GpuInit;
use crate::window::WindowProps;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window: WindowProps,

    /// Surface setup for the default winit/wgpu window.
    pub gpu: GpuInit,

    /// Upper bound on a single timestep in seconds. `None` (the default)
    /// reports the raw difference between clock readings.
    pub max_timestep: Option<f32>,
}

impl AppConfig {
    pub fn new(window: WindowProps) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowProps::default(),
            gpu: GpuInit::default(),
            max_timestep: None,
        }
    }
}
