use ember_engine::events::{Event, EventDispatcher, MouseScrolledEvent, WindowResizeEvent};
use ember_engine::input::{Input, Key};
use ember_engine::time::Timestep;

/// Zoom never goes below this.
const MIN_ZOOM: f32 = 0.25;

/// Zoom change per wheel line.
const ZOOM_STEP: f32 = 0.25;

const ROTATION_SPEED: f32 = 180.0;

/// Orthographic projection bounds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl CameraBounds {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

/// 2D camera: position in world units, rotation in degrees around +Z.
#[derive(Debug, Clone)]
pub struct OrthographicCamera {
    bounds: CameraBounds,
    position: [f32; 3],
    rotation: f32,
}

impl OrthographicCamera {
    pub fn new(bounds: CameraBounds) -> Self {
        Self {
            bounds,
            position: [0.0; 3],
            rotation: 0.0,
        }
    }

    pub fn set_projection(&mut self, bounds: CameraBounds) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> CameraBounds {
        self.bounds
    }

    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Column-major `projection * inverse(translate * rotate)`.
    pub fn view_projection(&self) -> [[f32; 4]; 4] {
        let b = self.bounds;
        let sx = 2.0 / b.width();
        let sy = 2.0 / b.height();
        let tx = -(b.right + b.left) / b.width();
        let ty = -(b.top + b.bottom) / b.height();

        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let [px, py, pz] = self.position;

        // Inverse view: rotate by -θ, then translate by -R(-θ)·p.
        let vx = -(cos * px + sin * py);
        let vy = -(-sin * px + cos * py);

        [
            [sx * cos, sy * -sin, 0.0, 0.0],
            [sx * sin, sy * cos, 0.0, 0.0],
            [0.0, 0.0, -1.0, 0.0],
            [sx * vx + tx, sy * vy + ty, pz, 1.0],
        ]
    }
}

/// Keyboard/wheel driven controller around an [`OrthographicCamera`].
///
/// WASD pans relative to the camera's rotation, Q/E rotate when rotation is
/// enabled. Pan speed scales with zoom so the on-screen speed stays constant.
#[derive(Debug, Clone)]
pub struct OrthographicCameraController {
    aspect_ratio: f32,
    zoom: f32,
    rotation_enabled: bool,
    camera: OrthographicCamera,
    position: [f32; 3],
    rotation: f32,
    translation_speed: f32,
}

impl OrthographicCameraController {
    pub fn new(aspect_ratio: f32, rotation_enabled: bool) -> Self {
        let zoom = 1.0;
        Self {
            aspect_ratio,
            zoom,
            rotation_enabled,
            camera: OrthographicCamera::new(bounds_for(aspect_ratio, zoom)),
            position: [0.0; 3],
            rotation: 0.0,
            translation_speed: zoom,
        }
    }

    pub fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.max(MIN_ZOOM);
        self.translation_speed = self.zoom;
        self.camera.set_projection(bounds_for(self.aspect_ratio, self.zoom));
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn on_update(&mut self, input: &dyn Input, ts: Timestep) {
        let step = self.translation_speed * ts;
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let [x, y, _] = &mut self.position;

        if input.is_key_pressed(Key::A) {
            *x -= cos * step;
            *y -= sin * step;
        } else if input.is_key_pressed(Key::D) {
            *x += cos * step;
            *y += sin * step;
        }

        if input.is_key_pressed(Key::W) {
            *x += -sin * step;
            *y += cos * step;
        } else if input.is_key_pressed(Key::S) {
            *x -= -sin * step;
            *y -= cos * step;
        }

        if self.rotation_enabled {
            if input.is_key_pressed(Key::Q) {
                self.rotation += ROTATION_SPEED * ts;
            }
            if input.is_key_pressed(Key::E) {
                self.rotation -= ROTATION_SPEED * ts;
            }

            if self.rotation > 180.0 {
                self.rotation -= 360.0;
            } else if self.rotation <= -180.0 {
                self.rotation += 360.0;
            }

            self.camera.rotation = self.rotation;
        }

        self.camera.position = self.position;
    }

    /// Reacts to wheel and resize events. Never marks them handled.
    pub fn on_event(&mut self, event: &mut Event) {
        let mut dispatcher = EventDispatcher::new(event);
        dispatcher.dispatch::<MouseScrolledEvent, _>(|e| self.on_mouse_scrolled(e));
        dispatcher.dispatch::<WindowResizeEvent, _>(|e| self.on_window_resized(e));
    }

    fn on_mouse_scrolled(&mut self, e: &MouseScrolledEvent) -> bool {
        self.set_zoom(self.zoom - e.y_offset * ZOOM_STEP);
        false
    }

    fn on_window_resized(&mut self, e: &WindowResizeEvent) -> bool {
        if e.height == 0 {
            return false;
        }
        self.aspect_ratio = e.width as f32 / e.height as f32;
        self.camera.set_projection(bounds_for(self.aspect_ratio, self.zoom));
        false
    }
}

fn bounds_for(aspect_ratio: f32, zoom: f32) -> CameraBounds {
    CameraBounds {
        left: -aspect_ratio * zoom,
        right: aspect_ratio * zoom,
        bottom: -zoom,
        top: zoom,
    }
}
