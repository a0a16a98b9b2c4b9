use ember_engine::events::Event;
use ember_engine::layer::{Layer, LayerCtx};
use ember_engine::time::Timestep;

use crate::camera::OrthographicCameraController;

/// Seconds between two stats lines in the log.
const STATS_INTERVAL: f32 = 5.0;

/// Camera playground: pans, rotates and zooms an orthographic camera.
pub struct SandboxLayer {
    camera: OrthographicCameraController,
    frames: u64,
    elapsed: f32,
    last_step: Timestep,
}

impl SandboxLayer {
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            camera: OrthographicCameraController::new(aspect_ratio, true),
            frames: 0,
            elapsed: 0.0,
            last_step: Timestep::ZERO,
        }
    }

    pub fn camera(&self) -> &OrthographicCameraController {
        &self.camera
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Layer for SandboxLayer {
    fn name(&self) -> &str {
        "Sandbox"
    }

    fn on_attach(&mut self) {
        log::info!("sandbox attached (aspect {:.3})", self.camera.aspect_ratio());
    }

    fn on_detach(&mut self) {
        log::info!("sandbox detached after {} frames", self.frames);
    }

    fn on_update(&mut self, ctx: &mut LayerCtx<'_>, ts: Timestep) {
        self.camera.on_update(ctx.input(), ts);
        self.frames += 1;
        self.elapsed += ts.seconds();
        self.last_step = ts;
    }

    fn on_ui_render(&mut self, _ctx: &mut LayerCtx<'_>) {
        if self.elapsed < STATS_INTERVAL {
            return;
        }
        self.elapsed = 0.0;

        let camera = self.camera().camera();
        let [x, y, _] = camera.position();
        let bounds = camera.bounds();
        log::debug!(
            "frame {} ({}), camera at ({x:.2}, {y:.2}) rot {:.1}, view {:.2}x{:.2}",
            self.frames(),
            self.last_step,
            camera.rotation(),
            bounds.width(),
            bounds.height()
        );
        log::trace!("view-projection: {:?}", camera.view_projection());
    }

    fn on_event(&mut self, _ctx: &mut LayerCtx<'_>, event: &mut Event) {
        self.camera.on_event(event);
    }
}
