//! Crop state model.
//!
//! [`EditorState`] is an immutable value. Every transition consumes the old
//! state and returns a new one with exactly one field replaced; everything else
//! is carried over. Nothing here renders or schedules work.
//!
//! # Invariants
//!
//! - Position components are always in `[0, 1]` (inputs are clamped).
//! - Scale is always within [`ScaleLimits`], and the lower limit is never
//!   below `1.0`: zooming out past a full-frame fit is not allowed.

use serde::{Deserialize, Serialize};

use crate::bitmap::Bitmap;
use crate::source::ImageHandle;

/// Focal point of the image, as fractions of image width and height.
///
/// `(0.5, 0.5)` is the image center. Construct through [`NormalizedPosition::new`]
/// to get clamped components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPosition {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPosition {
    /// The image center.
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    /// Create a position, clamping each axis to `[0, 1]`.
    ///
    /// A NaN axis falls back to the center (`0.5`).
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }
}

impl Default for NormalizedPosition {
    fn default() -> Self {
        Self::CENTER
    }
}

#[inline]
fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.5
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Allowed zoom range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleLimits {
    min: f64,
    max: f64,
}

impl ScaleLimits {
    /// Lowest minimum ever accepted: the image's shorter side fills the frame.
    pub const FLOOR: f64 = 1.0;

    /// Create limits, raising `min` to at least [`Self::FLOOR`] and `max` to at
    /// least `min`.
    pub fn new(min: f64, max: f64) -> Self {
        let min = if min.is_nan() {
            Self::FLOOR
        } else {
            min.max(Self::FLOOR)
        };
        let max = if max.is_nan() { min } else { max.max(min) };
        Self { min, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamp a requested scale into range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self { min: 1.0, max: 2.0 }
    }
}

/// Everything a single editor instance knows about the current crop.
///
/// `image` is `None` while the first image is still pending decode.
/// `preview` is derived: it matches the most recently completed preview
/// render, which may lag behind the latest framing.
#[derive(Debug, Clone)]
pub struct EditorState {
    image: Option<ImageHandle>,
    position: NormalizedPosition,
    scale: f64,
    limits: ScaleLimits,
    preview: Option<Bitmap>,
}

impl EditorState {
    /// Fresh state: no image yet, centered, at the minimum scale.
    pub fn new(limits: ScaleLimits) -> Self {
        Self {
            image: None,
            position: NormalizedPosition::CENTER,
            scale: limits.min(),
            limits,
            preview: None,
        }
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    pub fn position(&self) -> NormalizedPosition {
        self.position
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn limits(&self) -> ScaleLimits {
        self.limits
    }

    pub fn preview(&self) -> Option<&Bitmap> {
        self.preview.as_ref()
    }

    /// Whether an image has been decoded and the state can be rendered.
    pub fn is_ready(&self) -> bool {
        self.image.is_some()
    }

    /// Replace the image. Position and scale are kept so a new image starts
    /// from the last-used framing.
    pub fn with_image(self, image: ImageHandle) -> Self {
        Self {
            image: Some(image),
            ..self
        }
    }

    /// Replace the scale, clamped to the current limits. NaN is ignored.
    pub fn with_scale(self, value: f64) -> Self {
        if value.is_nan() {
            return self;
        }
        Self {
            scale: self.limits.clamp(value),
            ..self
        }
    }

    /// Replace the position, clamping each axis to `[0, 1]`.
    pub fn with_position(self, position: NormalizedPosition) -> Self {
        Self {
            position: NormalizedPosition::new(position.x, position.y),
            ..self
        }
    }

    /// Store a completed preview render.
    pub fn with_preview(self, preview: Bitmap) -> Self {
        Self {
            preview: Some(preview),
            ..self
        }
    }

    /// Copy of the framing (image, position, scale) without the preview.
    ///
    /// Snapshots for deferred rendering use this so the previous preview's
    /// pixels are never copied along.
    pub fn framing(&self) -> Self {
        Self {
            image: self.image.clone(),
            position: self.position,
            scale: self.scale,
            limits: self.limits,
            preview: None,
        }
    }

    /// Whether both states would render identically: same image, position
    /// and scale. The preview is ignored.
    pub fn same_framing(&self, other: &EditorState) -> bool {
        let same_image = match (&self.image, &other.image) {
            (Some(a), Some(b)) => a.same_image(b),
            (None, None) => true,
            _ => false,
        };
        same_image && self.position == other.position && self.scale == other.scale
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(ScaleLimits::default())
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
