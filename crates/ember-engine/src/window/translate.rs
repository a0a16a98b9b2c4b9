use std::collections::HashMap;

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::events::{
    Event, KeyPressedEvent, KeyReleasedEvent, KeyTypedEvent, MouseButtonPressedEvent,
    MouseButtonReleasedEvent, MouseMovedEvent, MouseScrolledEvent, WindowCloseEvent,
    WindowFocusEvent, WindowLostFocusEvent, WindowMovedEvent, WindowResizeEvent,
};
use crate::input::{Key, MouseButton};

/// Logical pixels treated as one wheel "line" for high-precision touchpads.
const PIXELS_PER_LINE: f64 = 20.0;

/// Stateful winit → engine event translation.
///
/// winit reports key auto-repeat as a flag; engine key events carry a repeat
/// count, so held keys are counted here.
#[derive(Debug, Default)]
pub(crate) struct Translator {
    repeats: HashMap<Key, u32>,
}

impl Translator {
    /// Appends the engine events produced by one winit event to `out`.
    ///
    /// `scale_factor` converts physical cursor positions to logical pixels.
    pub(crate) fn translate(&mut self, scale_factor: f64, event: &WindowEvent, out: &mut Vec<Event>) {
        match event {
            WindowEvent::CloseRequested => out.push(WindowCloseEvent.into()),

            WindowEvent::Resized(size) => out.push(
                WindowResizeEvent {
                    width: size.width,
                    height: size.height,
                }
                .into(),
            ),

            WindowEvent::Focused(true) => out.push(WindowFocusEvent.into()),
            WindowEvent::Focused(false) => {
                self.repeats.clear();
                out.push(WindowLostFocusEvent.into());
            }

            WindowEvent::Moved(pos) => out.push(WindowMovedEvent { x: pos.x, y: pos.y }.into()),

            WindowEvent::KeyboardInput { event, .. } => {
                let key = map_key(event.physical_key);
                match event.state {
                    ElementState::Pressed => {
                        let repeat_count = self.press(key, event.repeat);
                        out.push(KeyPressedEvent { key, repeat_count }.into());
                        if let Some(text) = &event.text {
                            out.extend(typed_chars(text).map(|ch| KeyTypedEvent { ch }.into()));
                        }
                    }
                    ElementState::Released => {
                        self.release(key);
                        out.push(KeyReleasedEvent { key }.into());
                    }
                }
            }

            WindowEvent::Ime(winit::event::Ime::Commit(text)) => {
                out.extend(typed_chars(text).map(|ch| KeyTypedEvent { ch }.into()));
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_mouse_button(*button);
                out.push(match state {
                    ElementState::Pressed => MouseButtonPressedEvent { button }.into(),
                    ElementState::Released => MouseButtonReleasedEvent { button }.into(),
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = to_logical(*position, scale_factor);
                out.push(MouseMovedEvent { x, y }.into());
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let (x_offset, y_offset) = scroll_offsets(*delta, scale_factor);
                out.push(MouseScrolledEvent { x_offset, y_offset }.into());
            }

            _ => {}
        }
    }

    fn press(&mut self, key: Key, repeat: bool) -> u32 {
        let count = self.repeats.entry(key).or_insert(0);
        if repeat {
            *count += 1;
        } else {
            *count = 0;
        }
        *count
    }

    fn release(&mut self, key: Key) {
        self.repeats.remove(&key);
    }
}

fn to_logical(pos: PhysicalPosition<f64>, scale_factor: f64) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(scale_factor);
    (logical.x as f32, logical.y as f32)
}

fn scroll_offsets(delta: MouseScrollDelta, scale_factor: f64) -> (f32, f32) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (x, y),
        MouseScrollDelta::PixelDelta(p) => {
            let logical = p.to_logical::<f64>(scale_factor);
            (
                (logical.x / PIXELS_PER_LINE) as f32,
                (logical.y / PIXELS_PER_LINE) as f32,
            )
        }
    }
}

/// Printable characters of a committed text chunk.
fn typed_chars(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(|c| !c.is_control())
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = pk else {
        // Native codes have no stable numeric form in winit 0.30.
        return Key::Unknown(0);
    };

    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,

        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::ShiftRight => Key::RightShift,
        KeyCode::ControlLeft => Key::LeftControl,
        KeyCode::ControlRight => Key::RightControl,
        KeyCode::AltLeft => Key::LeftAlt,
        KeyCode::AltRight => Key::RightAlt,
        KeyCode::SuperLeft => Key::LeftSuper,
        KeyCode::SuperRight => Key::RightSuper,

        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,

        KeyCode::Minus => Key::Minus,
        KeyCode::Equal => Key::Equal,

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,

        other => Key::Unknown(other as u32),
    }
}
