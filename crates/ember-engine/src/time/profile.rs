use std::time::{Duration, Instant};

/// Wall time spent in each phase of one scheduler iteration.
///
/// Phases skipped while minimized stay at zero.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameProfile {
    pub update: Duration,
    pub ui_render: Duration,
    pub service: Duration,
    pub total: Duration,
}

/// Times a named phase until dropped.
///
/// The elapsed time lands in `slot` and is logged at trace level:
///
/// ```rust,ignore
/// let mut profile = FrameProfile::default();
/// {
///     let _scope = ProfileScope::new("LayerStack update", &mut profile.update);
///     update_layers();
/// }
/// ```
pub struct ProfileScope<'a> {
    name: &'static str,
    start: Instant,
    slot: &'a mut Duration,
}

impl<'a> ProfileScope<'a> {
    pub fn new(name: &'static str, slot: &'a mut Duration) -> Self {
        Self {
            name,
            start: Instant::now(),
            slot,
        }
    }
}

impl Drop for ProfileScope<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        *self.slot = elapsed;
        log::trace!("{}: {:.3} ms", self.name, elapsed.as_secs_f64() * 1000.0);
    }
}
