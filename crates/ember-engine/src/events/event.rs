use std::fmt;

use crate::input::{Key, MouseButton};

use super::category::EventCategory;

/// Closed set of platform and application event kinds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    WindowClose,
    WindowResize,
    WindowFocus,
    WindowLostFocus,
    WindowMoved,

    AppTick,
    AppUpdate,
    AppRender,

    KeyPressed,
    KeyReleased,
    KeyTyped,

    MouseButtonPressed,
    MouseButtonReleased,
    MouseMoved,
    MouseScrolled,
}

impl EventKind {
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::WindowClose => "WindowClose",
            EventKind::WindowResize => "WindowResize",
            EventKind::WindowFocus => "WindowFocus",
            EventKind::WindowLostFocus => "WindowLostFocus",
            EventKind::WindowMoved => "WindowMoved",
            EventKind::AppTick => "AppTick",
            EventKind::AppUpdate => "AppUpdate",
            EventKind::AppRender => "AppRender",
            EventKind::KeyPressed => "KeyPressed",
            EventKind::KeyReleased => "KeyReleased",
            EventKind::KeyTyped => "KeyTyped",
            EventKind::MouseButtonPressed => "MouseButtonPressed",
            EventKind::MouseButtonReleased => "MouseButtonReleased",
            EventKind::MouseMoved => "MouseMoved",
            EventKind::MouseScrolled => "MouseScrolled",
        }
    }

    pub const fn category_flags(self) -> EventCategory {
        const KEY: EventCategory = EventCategory::INPUT.union(EventCategory::KEYBOARD);
        const MOUSE: EventCategory = EventCategory::INPUT.union(EventCategory::MOUSE);
        const BUTTON: EventCategory = MOUSE.union(EventCategory::MOUSE_BUTTON);

        match self {
            EventKind::WindowClose
            | EventKind::WindowResize
            | EventKind::WindowFocus
            | EventKind::WindowLostFocus
            | EventKind::WindowMoved
            | EventKind::AppTick
            | EventKind::AppUpdate
            | EventKind::AppRender => EventCategory::APPLICATION,

            EventKind::KeyPressed | EventKind::KeyReleased | EventKind::KeyTyped => KEY,

            EventKind::MouseMoved | EventKind::MouseScrolled => MOUSE,

            EventKind::MouseButtonPressed | EventKind::MouseButtonReleased => BUTTON,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Payloads ──────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct WindowCloseEvent;

/// New framebuffer size in physical pixels. Either dimension may be zero
/// (minimized window).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WindowResizeEvent {
    pub width: u32,
    pub height: u32,
}

impl WindowResizeEvent {
    pub fn is_zero_area(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct WindowFocusEvent;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct WindowLostFocusEvent;

/// Outer window position in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WindowMovedEvent {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct AppTickEvent;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct AppUpdateEvent;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct AppRenderEvent;

/// Key press. `repeat_count` is zero for the initial press and grows while
/// the key is held and the platform auto-repeats.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyPressedEvent {
    pub key: Key,
    pub repeat_count: u32,
}

impl KeyPressedEvent {
    pub fn is_repeat(&self) -> bool {
        self.repeat_count > 0
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyReleasedEvent {
    pub key: Key,
}

/// Committed character input.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyTypedEvent {
    pub ch: char,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MouseButtonPressedEvent {
    pub button: MouseButton,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MouseButtonReleasedEvent {
    pub button: MouseButton,
}

/// Pointer position in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MouseMovedEvent {
    pub x: f32,
    pub y: f32,
}

/// Wheel offsets in "lines"; positive `y_offset` scrolls up/away from the user.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MouseScrolledEvent {
    pub x_offset: f32,
    pub y_offset: f32,
}

/// A payload type with a fixed static kind.
///
/// `narrow` is a safe pattern match on [`EventData`]; it returns `None` for
/// every other kind.
pub trait EventType: Sized + Into<EventData> {
    const KIND: EventKind;

    fn narrow(data: &EventData) -> Option<&Self>;
}

macro_rules! event_types {
    ($($kind:ident => $ty:ident),* $(,)?) => {
        /// Kind-specific payload carried by an [`Event`].
        #[derive(Debug, Clone, PartialEq)]
        pub enum EventData {
            $($kind($ty),)*
        }

        impl EventData {
            pub const fn kind(&self) -> EventKind {
                match self {
                    $(EventData::$kind(_) => EventKind::$kind,)*
                }
            }
        }

        $(
            impl EventType for $ty {
                const KIND: EventKind = EventKind::$kind;

                fn narrow(data: &EventData) -> Option<&Self> {
                    match data {
                        EventData::$kind(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for EventData {
                fn from(value: $ty) -> Self {
                    EventData::$kind(value)
                }
            }

            impl From<$ty> for Event {
                fn from(value: $ty) -> Self {
                    Event::new(value)
                }
            }
        )*
    };
}

event_types! {
    WindowClose => WindowCloseEvent,
    WindowResize => WindowResizeEvent,
    WindowFocus => WindowFocusEvent,
    WindowLostFocus => WindowLostFocusEvent,
    WindowMoved => WindowMovedEvent,
    AppTick => AppTickEvent,
    AppUpdate => AppUpdateEvent,
    AppRender => AppRenderEvent,
    KeyPressed => KeyPressedEvent,
    KeyReleased => KeyReleasedEvent,
    KeyTyped => KeyTypedEvent,
    MouseButtonPressed => MouseButtonPressedEvent,
    MouseButtonReleased => MouseButtonReleasedEvent,
    MouseMoved => MouseMovedEvent,
    MouseScrolled => MouseScrolledEvent,
}

// ── Event ─────────────────────────────────────────────────────────────────

/// A platform or application event travelling through one dispatch pass.
///
/// The kind is fixed at construction. `handled` only ever moves from `false`
/// to `true`; once set, the application stops delivering the event to further
/// layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    data: EventData,
    handled: bool,
}

impl Event {
    pub fn new(data: impl Into<EventData>) -> Self {
        Self {
            data: data.into(),
            handled: false,
        }
    }

    #[inline]
    pub fn kind(&self) -> EventKind {
        self.data.kind()
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    #[inline]
    pub fn category_flags(&self) -> EventCategory {
        self.kind().category_flags()
    }

    #[inline]
    pub fn is_in_category(&self, category: EventCategory) -> bool {
        self.category_flags().intersects(category)
    }

    #[inline]
    pub fn handled(&self) -> bool {
        self.handled
    }

    /// Marks the event consumed. There is no way back to unhandled.
    #[inline]
    pub fn mark_handled(&mut self) {
        self.handled = true;
    }

    /// ORs `consumed` into the handled flag.
    #[inline]
    pub fn merge_handled(&mut self, consumed: bool) {
        self.handled |= consumed;
    }

    #[inline]
    pub fn data(&self) -> &EventData {
        &self.data
    }

    /// Narrows to a concrete payload type, or `None` on kind mismatch.
    #[inline]
    pub fn narrow<T: EventType>(&self) -> Option<&T> {
        T::narrow(&self.data)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Event", self.name())?;
        match &self.data {
            EventData::WindowResize(e) => write!(f, ": {}, {}", e.width, e.height),
            EventData::WindowMoved(e) => write!(f, ": {}, {}", e.x, e.y),
            EventData::KeyPressed(e) => write!(f, ": {} ({} repeats)", e.key, e.repeat_count),
            EventData::KeyReleased(e) => write!(f, ": {}", e.key),
            EventData::KeyTyped(e) => write!(f, ": {:?}", e.ch),
            EventData::MouseButtonPressed(e) => write!(f, ": {:?}", e.button),
            EventData::MouseButtonReleased(e) => write!(f, ": {:?}", e.button),
            EventData::MouseMoved(e) => write!(f, ": {}, {}", e.x, e.y),
            EventData::MouseScrolled(e) => write!(f, ": {}, {}", e.x_offset, e.y_offset),
            EventData::WindowClose(_)
            | EventData::WindowFocus(_)
            | EventData::WindowLostFocus(_)
            | EventData::AppTick(_)
            | EventData::AppUpdate(_)
            | EventData::AppRender(_) => Ok(()),
        }
    }
}
