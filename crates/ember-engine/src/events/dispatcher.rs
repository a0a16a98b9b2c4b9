use super::event::{Event, EventType};

/// Type-narrowing router over a single event.
///
/// Each `dispatch::<T>` call checks the event's kind against `T::KIND`. On a
/// match the handler runs with the narrowed payload and its return value is
/// ORed into the handled flag. A mismatch leaves the event untouched.
///
/// The handler's `bool` means "this handler consumed the event". Stopping the
/// pass across layers is the application's job, so several `dispatch` calls on
/// the same dispatcher all run even after one of them consumed the event.
///
/// ```rust,ignore
/// let mut dispatcher = EventDispatcher::new(event);
/// dispatcher.dispatch::<KeyPressedEvent, _>(|e| self.on_key_pressed(e));
/// dispatcher.dispatch::<WindowResizeEvent, _>(|e| self.on_resize(e));
/// ```
pub struct EventDispatcher<'a> {
    event: &'a mut Event,
}

impl<'a> EventDispatcher<'a> {
    pub fn new(event: &'a mut Event) -> Self {
        Self { event }
    }

    /// Returns `true` when the event is of kind `T` (whether or not the handler
    /// consumed it).
    pub fn dispatch<T, F>(&mut self, handler: F) -> bool
    where
        T: EventType,
        F: FnOnce(&T) -> bool,
    {
        if self.event.kind() != T::KIND {
            return false;
        }

        let Some(payload) = self.event.narrow::<T>() else {
            return false;
        };

        let consumed = handler(payload);
        self.event.merge_handled(consumed);
        true
    }

    pub fn event(&self) -> &Event {
        self.event
    }
}
