//! Trailing-edge debounce of preview renders.

use std::time::Duration;

use tracing::debug;

use super::Clock;
use crate::bitmap::Bitmap;
use crate::render::{render_with, FrameSize, RenderError, RenderOptions};
use crate::state::EditorState;

/// Where the scheduler is in its lifecycle.
#[derive(Debug)]
enum Phase {
    Idle,
    Pending {
        deadline: Duration,
        snapshot: EditorState,
    },
    /// Terminal: nothing is scheduled or rendered after teardown.
    TornDown,
}

/// Renders a preview of the latest scheduled state once no new state has
/// arrived for a full quiescence window.
///
/// - `Idle` -> [`schedule`](Self::schedule) -> `Pending`
/// - `Pending` -> `schedule` -> `Pending` with the timer restarted and the
///   snapshot replaced
/// - `Pending` -> [`poll`](Self::poll) after the deadline -> render -> `Idle`
/// - any -> [`teardown`](Self::teardown) -> `TornDown`
///
/// Only the last state of a burst is ever rendered.
pub struct PreviewScheduler<C: Clock> {
    clock: C,
    window: Duration,
    frame: FrameSize,
    options: RenderOptions,
    phase: Phase,
}

impl<C: Clock> PreviewScheduler<C> {
    pub fn new(clock: C, window: Duration, frame: FrameSize, options: RenderOptions) -> Self {
        Self {
            clock,
            window,
            frame,
            options,
            phase: Phase::Idle,
        }
    }

    /// Record `state` as the one to preview and restart the quiescence timer.
    pub fn schedule(&mut self, state: &EditorState) {
        if matches!(self.phase, Phase::TornDown) {
            return;
        }

        let deadline = self.clock.now() + self.window;
        if matches!(self.phase, Phase::Pending { .. }) {
            debug!(?deadline, "preview timer restarted");
        } else {
            debug!(?deadline, "preview timer armed");
        }

        self.phase = Phase::Pending {
            deadline,
            snapshot: state.framing(),
        };
    }

    /// Timer callback. Renders and returns the preview once the deadline has
    /// passed; returns `None` while idle, still waiting, or torn down.
    pub fn poll(&mut self) -> Option<Bitmap> {
        let now = self.clock.now();
        match &self.phase {
            Phase::Pending { deadline, .. } if now >= *deadline => {}
            _ => return None,
        }

        let Phase::Pending { snapshot, .. } = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return None;
        };

        match render_with(&snapshot, self.frame, self.options) {
            Ok(bitmap) => {
                debug!(
                    scale = snapshot.scale(),
                    x = snapshot.position().x,
                    y = snapshot.position().y,
                    "preview rendered"
                );
                Some(bitmap)
            }
            Err(RenderError::NotReady) => {
                debug!("preview skipped: image not decoded yet");
                None
            }
            Err(err) => {
                debug!(%err, "preview render failed");
                None
            }
        }
    }

    /// Time left before [`poll`](Self::poll) will render, or `None` when nothing
    /// is pending.
    pub fn time_until_due(&self) -> Option<Duration> {
        match &self.phase {
            Phase::Pending { deadline, .. } => Some(deadline.saturating_sub(self.clock.now())),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending { .. })
    }

    pub fn is_torn_down(&self) -> bool {
        matches!(self.phase, Phase::TornDown)
    }

    /// Cancel any pending preview and stop accepting new ones.
    pub fn teardown(&mut self) {
        if self.is_pending() {
            debug!("pending preview cancelled by teardown");
        }
        self.phase = Phase::TornDown;
    }
}
