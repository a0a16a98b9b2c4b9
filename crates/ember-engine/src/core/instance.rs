use std::sync::atomic::{AtomicBool, Ordering};

static LIVE: AtomicBool = AtomicBool::new(false);

/// Occupies the process-wide application slot until dropped.
#[derive(Debug)]
pub(crate) struct InstanceGuard(());

impl InstanceGuard {
    /// Panics if another application is alive.
    pub(crate) fn acquire() -> Self {
        let free = LIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        assert!(free, "Application already exists");
        Self(())
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        LIVE.store(false, Ordering::Release);
    }
}

/// Whether an `Application` is currently alive in this process.
pub fn application_exists() -> bool {
    LIVE.load(Ordering::Acquire)
}

/// Tests that construct an `Application` hold this for their whole body.
#[cfg(test)]
pub(crate) fn serial() -> std::sync::MutexGuard<'static, ()> {
    static SERIAL: std::sync::Mutex<()> = std::sync::Mutex::new(());
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}
