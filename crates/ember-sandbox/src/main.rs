mod camera;
mod editor_layer;
mod sandbox_layer;

use anyhow::Result;
use ember_engine::core::{AppConfig, Application};
use ember_engine::logging::{LoggingConfig, init_logging};
use ember_engine::window::WindowProps;

use editor_layer::EditorLayer;
use sandbox_layer::SandboxLayer;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut config = AppConfig::new(WindowProps::new("Ember Sandbox", 1280, 720));
    config.gpu.clear_color = wgpu::Color {
        r: 0.08,
        g: 0.09,
        b: 0.12,
        a: 1.0,
    };

    let mut app = Application::with_winit(config)?;

    let aspect = app.viewport().aspect_ratio().unwrap_or(16.0 / 9.0);
    app.push_layer(SandboxLayer::new(aspect));
    app.push_layer(EditorLayer::new());

    app.run();
    Ok(())
}
