//! Editor configuration.
//!
//! Field names are camelCase so a plain JS object can be deserialized as-is;
//! every field is optional and falls back to its default.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::preview::DEFAULT_DEBOUNCE_MS;
use crate::render::{FrameSize, RenderOptions, Sampling, ViewStyle};
use crate::state::ScaleLimits;

/// Largest accepted canvas side in pixels, border included.
pub const MAX_CANVAS_DIMENSION: u32 = 8192;

/// Errors raised by [`EditorConfig::validate`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// The crop frame has no pixels.
    #[error("Invalid frame: width ({width}) and height ({height}) must be non-zero")]
    InvalidFrame { width: u32, height: u32 },

    /// The preview quiescence window must be at least one millisecond.
    #[error("Invalid debounce window: must be at least 1 ms")]
    InvalidDebounce,

    /// The editable canvas (frame plus border on both sides) exceeds
    /// [`MAX_CANVAS_DIMENSION`] on some axis.
    #[error("Canvas too large: {width}x{height} exceeds the {max} px limit")]
    CanvasTooLarge { width: u64, height: u64, max: u32 },

    /// Scale limits are not finite or are inverted.
    #[error("Invalid scale range: min ({min}) must be finite and not above max ({max})")]
    InvalidScaleRange { min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub frame_width: u32,
    pub frame_height: u32,
    /// Border around the frame in the editable canvas, in pixels.
    pub border: u32,
    /// Values below 1.0 are raised to 1.0.
    pub min_scale: f64,
    pub max_scale: f64,
    pub debounce_ms: u64,
    /// When false the editor never schedules previews.
    pub preview_enabled: bool,
    /// RGBA color blended over the canvas outside the crop circle.
    pub overlay_color: [u8; 4],
    pub sampling: Sampling,
    /// Clamp the framing so the image always covers the whole frame.
    pub keep_covered: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let style = ViewStyle::default();
        Self {
            frame_width: 231,
            frame_height: 231,
            border: style.border,
            min_scale: 1.0,
            max_scale: 2.0,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            preview_enabled: true,
            overlay_color: style.overlay,
            sampling: Sampling::default(),
            keep_covered: false,
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame().is_empty() {
            return Err(ConfigError::InvalidFrame {
                width: self.frame_width,
                height: self.frame_height,
            });
        }
        let (width, height) = self.canvas_size();
        let max = u64::from(MAX_CANVAS_DIMENSION);
        if width > max || height > max {
            return Err(ConfigError::CanvasTooLarge {
                width,
                height,
                max: MAX_CANVAS_DIMENSION,
            });
        }
        if self.debounce_ms == 0 {
            return Err(ConfigError::InvalidDebounce);
        }
        if !self.min_scale.is_finite()
            || !self.max_scale.is_finite()
            || self.min_scale > self.max_scale
        {
            return Err(ConfigError::InvalidScaleRange {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        Ok(())
    }

    /// Editable canvas size, computed wide enough that it cannot overflow.
    pub fn canvas_size(&self) -> (u64, u64) {
        let border = 2 * u64::from(self.border);
        (
            u64::from(self.frame_width) + border,
            u64::from(self.frame_height) + border,
        )
    }

    pub fn frame(&self) -> FrameSize {
        FrameSize::new(self.frame_width, self.frame_height)
    }

    pub fn scale_limits(&self) -> ScaleLimits {
        ScaleLimits::new(self.min_scale, self.max_scale)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            sampling: self.sampling,
            keep_covered: self.keep_covered,
        }
    }

    pub fn view_style(&self) -> ViewStyle {
        ViewStyle {
            border: self.border,
            overlay: self.overlay_color,
        }
    }
}
