//! Browser time source for the preview scheduler.

use std::time::Duration;

use avatar_crop_core::Clock;

/// Milliseconds from `Date.now()`, measured from when the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct JsClock {
    origin_ms: f64,
}

impl JsClock {
    pub fn new() -> Self {
        Self {
            origin_ms: js_sys::Date::now(),
        }
    }
}

impl Default for JsClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for JsClock {
    fn now(&self) -> Duration {
        // Date.now() can step backwards when the system clock is adjusted
        let elapsed_ms = (js_sys::Date::now() - self.origin_ms).max(0.0);
        Duration::from_secs_f64(elapsed_ms / 1000.0)
    }
}
