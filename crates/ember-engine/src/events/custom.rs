use std::any::Any;
use std::fmt;
use std::sync::Mutex;

use super::category::EventCategory;

/// Names of registered custom kinds, indexed by kind id.
static REGISTRY: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

/// Open-ended event kind, issued at registration and compared by value.
///
/// New kinds can be introduced anywhere without touching the closed
/// [`EventKind`](super::EventKind) enumeration or the dispatcher:
///
/// ```rust,ignore
/// static SCENE_SAVED: LazyLock<CustomEventKind> =
///     LazyLock::new(|| CustomEventKind::register("SceneSaved"));
///
/// impl CustomEventType for SceneSaved {
///     fn kind() -> CustomEventKind { *SCENE_SAVED }
/// }
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CustomEventKind(u32);

impl CustomEventKind {
    /// Issues a fresh kind. Registering the same name twice yields two
    /// distinct kinds; callers keep the result in a `static`.
    pub fn register(name: &'static str) -> Self {
        let mut names = REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let id = issue_id(names.len());
        names.push(name);
        log::debug!("registered custom event kind '{name}' as #{id}");
        Self(id)
    }

    #[inline]
    pub fn id(self) -> u32 {
        self.0
    }

    pub fn name(self) -> &'static str {
        let names = REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        names.get(self.0 as usize).copied().unwrap_or("<unregistered>")
    }
}

/// Next id for a registry already holding `issued` kinds.
///
/// # Panics
///
/// When every `u32` id has been handed out; ids are never reused.
fn issue_id(issued: usize) -> u32 {
    match u32::try_from(issued) {
        Ok(id) => id,
        Err(_) => panic!("custom event kind registry exhausted after {issued} kinds"),
    }
}

impl fmt::Display for CustomEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A payload type that travels as a [`CustomEvent`].
pub trait CustomEventType: Any {
    /// Kind carried by events of this payload type.
    ///
    /// Each kind belongs to exactly one payload type. Two types returning the
    /// same kind cannot be told apart by kind comparison, and dispatching to
    /// the wrong one is a programming error.
    fn kind() -> CustomEventKind;

    /// Extra categories; `CUSTOM` is always added.
    fn category() -> EventCategory {
        EventCategory::CUSTOM
    }
}

/// Event record for kinds outside the closed enumeration.
///
/// Shares the handled-flag contract of [`Event`](super::Event).
pub struct CustomEvent {
    kind: CustomEventKind,
    category: EventCategory,
    payload: Box<dyn Any>,
    handled: bool,
}

impl CustomEvent {
    pub fn new<T: CustomEventType>(payload: T) -> Self {
        Self {
            kind: T::kind(),
            category: T::category() | EventCategory::CUSTOM,
            payload: Box::new(payload),
            handled: false,
        }
    }

    #[inline]
    pub fn kind(&self) -> CustomEventKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    #[inline]
    pub fn category_flags(&self) -> EventCategory {
        self.category
    }

    #[inline]
    pub fn is_in_category(&self, category: EventCategory) -> bool {
        self.category.intersects(category)
    }

    #[inline]
    pub fn handled(&self) -> bool {
        self.handled
    }

    #[inline]
    pub fn mark_handled(&mut self) {
        self.handled = true;
    }

    #[inline]
    pub fn merge_handled(&mut self, consumed: bool) {
        self.handled |= consumed;
    }

    /// Narrows to `T` when the kinds match.
    pub fn payload<T: CustomEventType>(&self) -> Option<&T> {
        if self.kind != T::kind() {
            return None;
        }
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for CustomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomEvent")
            .field("kind", &self.kind)
            .field("name", &self.name())
            .field("category", &self.category)
            .field("handled", &self.handled)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for CustomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Open-kind analogue of [`EventDispatcher`](super::EventDispatcher).
pub struct CustomEventDispatcher<'a> {
    event: &'a mut CustomEvent,
}

impl<'a> CustomEventDispatcher<'a> {
    pub fn new(event: &'a mut CustomEvent) -> Self {
        Self { event }
    }

    pub fn dispatch<T, F>(&mut self, handler: F) -> bool
    where
        T: CustomEventType,
        F: FnOnce(&T) -> bool,
    {
        if self.event.kind != T::kind() {
            return false;
        }

        let Some(payload) = self.event.payload.downcast_ref::<T>() else {
            debug_assert!(
                false,
                "custom event kind '{}' is shared by more than one payload type",
                self.event.name()
            );
            log::error!(
                "custom event '{}' carries a different payload type than the handler expects",
                self.event.name()
            );
            return false;
        };

        let consumed = handler(payload);
        self.event.merge_handled(consumed);
        true
    }

    pub fn event(&self) -> &CustomEvent {
        self.event
    }
}
