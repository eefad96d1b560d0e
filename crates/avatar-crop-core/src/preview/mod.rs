//! Debounced preview rendering.
//!
//! While the user drags or zooms, the editable view redraws on every change,
//! but the preview render only runs once input has been quiet for a full
//! window (100 ms by default). A burst of N changes yields exactly one render,
//! of the last state.
//!
//! The scheduler is poll-driven: the host asks [`PreviewScheduler::time_until_due`]
//! how long to wait, arms whatever timer it has, and calls
//! [`PreviewScheduler::poll`] when it fires. Time comes from an injected
//! [`Clock`].

mod clock;
mod scheduler;

#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use clock::{Clock, ManualClock};
pub use scheduler::PreviewScheduler;

/// Default quiescence window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;
