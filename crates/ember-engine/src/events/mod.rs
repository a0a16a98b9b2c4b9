//! Event model and dispatch.
//!
//! Events are blocking: an event is created where it occurs (input poll,
//! window callback), routed synchronously through the layer stack and dropped
//! after one pass. Nothing here is buffered.

mod category;
mod custom;
mod dispatcher;
mod event;

pub use category::EventCategory;
pub use custom::{CustomEvent, CustomEventDispatcher, CustomEventKind, CustomEventType};
pub use dispatcher::EventDispatcher;
pub use event::{
    AppRenderEvent, AppTickEvent, AppUpdateEvent, Event, EventData, EventKind, EventType,
    KeyPressedEvent, KeyReleasedEvent, KeyTypedEvent, MouseButtonPressedEvent,
    MouseButtonReleasedEvent, MouseMovedEvent, MouseScrolledEvent, WindowCloseEvent,
    WindowFocusEvent, WindowLostFocusEvent, WindowMovedEvent, WindowResizeEvent,
};
