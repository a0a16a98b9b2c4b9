use std::collections::HashSet;

use crate::events::{Event, EventData};

use super::Input;
use super::types::{Key, Modifiers, MouseButton};

/// Input snapshot built from the events delivered to the application.
///
/// Holds "is down" state plus the transitions of the current frame. Layers
/// read it during update/UI-render; `refresh` clears the transitions once the
/// frame is consumed, before the window pumps the next batch of events.
#[derive(Debug, Default)]
pub struct InputState {
    focused: bool,
    pointer_pos: Option<(f32, f32)>,

    keys_down: HashSet<Key>,
    buttons_down: HashSet<MouseButton>,

    keys_pressed: HashSet<Key>,
    keys_released: HashSet<Key>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    scroll: (f32, f32),
    text: String,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            focused: true,
            ..Self::default()
        }
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn modifiers(&self) -> Modifiers {
        let down = |a, b| self.keys_down.contains(&a) || self.keys_down.contains(&b);
        Modifiers {
            shift: down(Key::LeftShift, Key::RightShift),
            ctrl: down(Key::LeftControl, Key::RightControl),
            alt: down(Key::LeftAlt, Key::RightAlt),
            meta: down(Key::LeftSuper, Key::RightSuper),
        }
    }

    /// Key went down during the current frame.
    pub fn was_key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn was_key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn was_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn was_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Accumulated wheel offsets for the current frame.
    pub fn scroll_delta(&self) -> (f32, f32) {
        self.scroll
    }

    /// Characters typed during the current frame.
    pub fn typed_text(&self) -> &str {
        &self.text
    }
}

impl Input for InputState {
    fn observe(&mut self, event: &Event) {
        match event.data() {
            EventData::KeyPressed(e) => {
                if self.keys_down.insert(e.key) {
                    self.keys_pressed.insert(e.key);
                }
            }
            EventData::KeyReleased(e) => {
                if self.keys_down.remove(&e.key) {
                    self.keys_released.insert(e.key);
                }
            }
            EventData::KeyTyped(e) => self.text.push(e.ch),

            EventData::MouseButtonPressed(e) => {
                if self.buttons_down.insert(e.button) {
                    self.buttons_pressed.insert(e.button);
                }
            }
            EventData::MouseButtonReleased(e) => {
                if self.buttons_down.remove(&e.button) {
                    self.buttons_released.insert(e.button);
                }
            }
            EventData::MouseMoved(e) => self.pointer_pos = Some((e.x, e.y)),
            EventData::MouseScrolled(e) => {
                self.scroll.0 += e.x_offset;
                self.scroll.1 += e.y_offset;
            }

            EventData::WindowFocus(_) => self.focused = true,
            EventData::WindowLostFocus(_) => {
                // Releases that happen while unfocused never reach us.
                self.focused = false;
                self.keys_down.clear();
                self.buttons_down.clear();
            }

            _ => {}
        }
    }

    fn refresh(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.scroll = (0.0, 0.0);
        self.text.clear();
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    fn mouse_position(&self) -> Option<(f32, f32)> {
        self.pointer_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{
        KeyPressedEvent, KeyReleasedEvent, KeyTypedEvent, MouseButtonPressedEvent,
        MouseMovedEvent, MouseScrolledEvent, WindowLostFocusEvent,
    };

    fn press(state: &mut InputState, key: Key) {
        state.observe(&Event::new(KeyPressedEvent { key, repeat_count: 0 }));
    }

    #[test]
    fn press_and_release_track_down_state() {
        let mut s = InputState::new();
        press(&mut s, Key::W);
        assert!(s.is_key_pressed(Key::W));
        assert!(s.was_key_pressed(Key::W));

        s.observe(&Event::new(KeyReleasedEvent { key: Key::W }));
        assert!(!s.is_key_pressed(Key::W));
        assert!(s.was_key_released(Key::W));
    }

    #[test]
    fn refresh_clears_transitions_but_not_held_keys() {
        let mut s = InputState::new();
        press(&mut s, Key::A);
        s.observe(&Event::new(KeyTypedEvent { ch: 'a' }));
        s.observe(&Event::new(MouseScrolledEvent { x_offset: 0.0, y_offset: 2.0 }));

        s.refresh();

        assert!(s.is_key_pressed(Key::A));
        assert!(!s.was_key_pressed(Key::A));
        assert_eq!(s.typed_text(), "");
        assert_eq!(s.scroll_delta(), (0.0, 0.0));
    }

    #[test]
    fn repeated_press_is_not_a_new_transition() {
        let mut s = InputState::new();
        press(&mut s, Key::S);
        s.refresh();
        s.observe(&Event::new(KeyPressedEvent { key: Key::S, repeat_count: 1 }));
        assert!(!s.was_key_pressed(Key::S));
    }

    #[test]
    fn modifiers_fold_left_and_right() {
        let mut s = InputState::new();
        press(&mut s, Key::RightControl);
        press(&mut s, Key::LeftShift);
        let m = s.modifiers();
        assert!(m.ctrl && m.shift);
        assert!(!m.alt && !m.meta);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut s = InputState::new();
        press(&mut s, Key::D);
        s.observe(&Event::new(MouseButtonPressedEvent { button: MouseButton::Left }));
        s.observe(&Event::new(WindowLostFocusEvent));

        assert!(!s.focused());
        assert!(!s.is_key_pressed(Key::D));
        assert!(!s.is_mouse_button_pressed(MouseButton::Left));
    }

    #[test]
    fn pointer_position_follows_moves() {
        let mut s = InputState::new();
        assert_eq!(s.mouse_position(), None);
        s.observe(&Event::new(MouseMovedEvent { x: 12.0, y: 34.0 }));
        assert_eq!(s.mouse_position(), Some((12.0, 34.0)));
    }
}
