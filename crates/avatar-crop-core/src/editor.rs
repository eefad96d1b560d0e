//! A single avatar editor instance.
//!
//! [`AvatarEditor`] owns the current [`EditorState`] and is the only place
//! where effects happen: every framing change is committed here and, if the
//! preview is enabled, handed to the [`PreviewScheduler`]. Editors never share
//! state, so any number of them can live on one page.

use std::mem;
use std::time::Duration;

use tracing::{debug, warn};

use crate::bitmap::Bitmap;
use crate::config::{ConfigError, EditorConfig};
use crate::gesture::{drag_delta, drag_delta_for_image, PointerDelta};
use crate::preview::{Clock, PreviewScheduler};
use crate::render::{covered_position, render_editor_view, render_with, RenderError};
use crate::source::{resolve, DecodeError, ImageHandle, ImageSource};
use crate::state::{EditorState, NormalizedPosition};

/// Callback invoked with each completed preview.
pub type PreviewListener = Box<dyn FnMut(&Bitmap)>;

pub struct AvatarEditor<C: Clock> {
    config: EditorConfig,
    state: EditorState,
    scheduler: Option<PreviewScheduler<C>>,
    listener: Option<PreviewListener>,
}

impl<C: Clock> AvatarEditor<C> {
    /// Create an editor with no image yet, centered, at the minimum scale.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from [`EditorConfig::validate`].
    pub fn new(config: EditorConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;

        let scheduler = config.preview_enabled.then(|| {
            PreviewScheduler::new(
                clock,
                config.debounce(),
                config.frame(),
                config.render_options(),
            )
        });

        Ok(Self {
            state: EditorState::new(config.scale_limits()),
            config,
            scheduler,
            listener: None,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// The most recent completed preview, if any.
    pub fn preview(&self) -> Option<&Bitmap> {
        self.state.preview()
    }

    /// Decode `source` and make it the current image.
    ///
    /// On failure the previous image and framing are left untouched.
    pub fn set_image(&mut self, source: ImageSource<'_>) -> Result<(), DecodeError> {
        match resolve(source) {
            Ok(handle) => {
                self.set_image_handle(handle);
                Ok(())
            }
            Err(err) => {
                warn!(source = source.label(), %err, "image rejected, keeping previous image");
                Err(err)
            }
        }
    }

    /// Load an asset compiled into the host, typically the default avatar
    /// shown before the user picks a file.
    pub fn load_bundled(&mut self, bytes: &'static [u8]) -> Result<(), DecodeError> {
        self.set_image(ImageSource::Bundled(bytes))
    }

    pub fn set_image_handle(&mut self, image: ImageHandle) {
        self.update(|state| state.with_image(image));
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.update(|state| state.with_scale(scale));
    }

    pub fn set_position(&mut self, position: NormalizedPosition) {
        self.update(|state| state.with_position(position));
    }

    /// Move the image with the pointer.
    pub fn drag(&mut self, pointer: PointerDelta) {
        let frame = self.config.frame();
        let scale = self.state.scale();
        let image_dims = self.state.image().map(ImageHandle::dimensions);

        let delta = match image_dims {
            Some(dims) => drag_delta_for_image(pointer, frame, scale, dims),
            None => drag_delta(pointer, frame, scale),
        };
        let mut position = delta.apply(self.state.position());

        if let Some(dims) = image_dims.filter(|_| self.config.keep_covered) {
            position = covered_position(dims, position, scale, frame);
        }

        self.set_position(position);
    }

    /// Render the editable canvas (frame plus border, outside dimmed).
    pub fn render_canvas(&self) -> Result<Bitmap, RenderError> {
        render_editor_view(
            &self.state,
            self.config.frame(),
            self.config.view_style(),
            self.config.render_options(),
        )
    }

    /// Render the circular crop right now, bypassing the debounce.
    pub fn render_crop(&self) -> Result<Bitmap, RenderError> {
        render_with(&self.state, self.config.frame(), self.config.render_options())
    }

    /// Register the callback for completed previews, replacing any previous one.
    pub fn on_preview_ready(&mut self, listener: impl FnMut(&Bitmap) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Drive the preview timer. Returns true when a new preview was produced.
    pub fn poll(&mut self) -> bool {
        let Some(bitmap) = self.scheduler.as_mut().and_then(PreviewScheduler::poll) else {
            return false;
        };

        if let Some(listener) = self.listener.as_mut() {
            listener(&bitmap);
        }
        let state = mem::take(&mut self.state);
        self.state = state.with_preview(bitmap);
        true
    }

    /// How long until [`poll`](Self::poll) should be called, or `None` when no
    /// preview is pending.
    pub fn time_until_preview(&self) -> Option<Duration> {
        self.scheduler.as_ref().and_then(PreviewScheduler::time_until_due)
    }

    /// Cancel any pending preview. Gestures keep updating the state afterwards
    /// but never schedule again.
    pub fn teardown(&mut self) {
        if let Some(scheduler) = self.scheduler.as_mut() {
            if !scheduler.is_torn_down() {
                debug!("editor torn down");
                scheduler.teardown();
            }
        }
        self.listener = None;
    }

    /// Apply a transition and schedule a preview if the framing changed.
    fn update(&mut self, transition: impl FnOnce(EditorState) -> EditorState) {
        let before = self.state.framing();
        let state = mem::take(&mut self.state);
        self.state = transition(state);

        if !self.state.same_framing(&before) {
            if let Some(scheduler) = self.scheduler.as_mut() {
                scheduler.schedule(&self.state);
            }
        }
    }
}

impl<C: Clock> Drop for AvatarEditor<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
